use clap::{Args, Subcommand, ValueEnum};

use crate::api::{FormData, PostingSource};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Navigation menu for a page
    Nav {
        /// Page path used to mark the active item
        #[arg(long, default_value = "/")]
        path: String,
        /// Build the menu from the auth-status endpoint
        #[arg(long)]
        legacy: bool,
    },
    /// Login or logout button
    AuthButtons,
    /// Postings table of the data view
    Postings {
        #[arg(long, value_enum, default_value_t = ListSource::All)]
        source: ListSource,
    },
    /// Your postings with dashboard stats
    MyPostings,
    /// Delete one of your postings
    Delete {
        id: i64,
        /// Answer the confirmation with yes
        #[arg(short, long)]
        yes: bool,
    },
    /// Dashboard counters
    Dashboard,
    /// Posting detail and its action panel
    Posting {
        hash: String,
        /// Open the application form
        #[arg(long)]
        open: bool,
    },
    /// Profile and recent activity
    Profile {
        /// Build the profile from per-user endpoints
        #[arg(long)]
        user_id: Option<i64>,
        /// Open the application at this index of the activity feed
        #[arg(long)]
        show: Option<usize>,
    },
    Login(LoginArgs),
    Register(RegisterArgs),
    Contact(ContactArgs),
    UpdateProfile(ProfileArgs),
    Apply(ApplyArgs),
}

/// Which list endpoint the data view reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListSource {
    All,
    Data,
}

impl From<ListSource> for PostingSource {
    fn from(source: ListSource) -> Self {
        match source {
            ListSource::All => PostingSource::All,
            ListSource::Data => PostingSource::Data,
        }
    }
}

/// Form values, named as the backend expects them.
pub trait FormArgs {
    fn fields(&self) -> FormData;
}

#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl FormArgs for LoginArgs {
    fn fields(&self) -> FormData {
        let mut form = FormData::new();
        form.push("email", &self.email);
        form.push("password", &self.password);
        form
    }
}

#[derive(Debug, Clone, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub surname: String,
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl FormArgs for RegisterArgs {
    fn fields(&self) -> FormData {
        let mut form = FormData::new();
        form.push("name", &self.name);
        form.push("surname", &self.surname);
        form.push("username", &self.username);
        form.push("email", &self.email);
        form.push("password", &self.password);
        form
    }
}

#[derive(Debug, Clone, Args)]
pub struct ContactArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub message: String,
}

impl FormArgs for ContactArgs {
    fn fields(&self) -> FormData {
        let mut form = FormData::new();
        form.push("name", &self.name);
        form.push("email", &self.email);
        form.push("message", &self.message);
        form
    }
}

/// Only the given fields are overwritten.
#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub user_id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub surname: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

impl FormArgs for ProfileArgs {
    fn fields(&self) -> FormData {
        let mut form = FormData::new();
        let fields = [
            ("name", &self.name),
            ("surname", &self.surname),
            ("username", &self.username),
            ("email", &self.email),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                form.push(name, value);
            }
        }
        form
    }
}

#[derive(Debug, Clone, Args)]
pub struct ApplyArgs {
    /// Hash of the posting to apply to
    pub hash: String,
    #[arg(long)]
    pub message: Option<String>,
    #[arg(long)]
    pub cover_letter: Option<String>,
}

impl FormArgs for ApplyArgs {
    fn fields(&self) -> FormData {
        let mut form = FormData::new();
        if let Some(message) = &self.message {
            form.push("message", message);
        }
        if let Some(cover_letter) = &self.cover_letter {
            form.push("cover_letter", cover_letter);
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_args_skip_unset_fields() {
        let args = ProfileArgs {
            user_id: 3,
            name: Some("Ana".into()),
            surname: None,
            username: None,
            email: Some("ana@example.com".into()),
        };
        let form = args.fields();
        assert_eq!(form.get("name"), Some("Ana"));
        assert_eq!(form.get("surname"), None);
        assert_eq!(form.iter().count(), 2);
    }
}
