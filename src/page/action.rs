use crate::model::Application;

/// What a bound element does when clicked. Handlers capture the entity they
/// act on instead of looking it up again.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ClosePopup(u64),
    DismissAlert,
    ShowApplicationForm,
    HideApplicationForm,
    DeletePosting { id: i64, title: String },
    ShowApplication(Box<Application>),
    CloseApplication,
    LoadPostings,
    Submit(FormKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Login,
    Register,
    Contact,
    Profile,
    Apply,
}
