use std::fmt;

/// A fragment of HTML that is safe to insert into a page.
///
/// The only ways to build one are [`Markup::text`], which escapes, the
/// [`Node`] builder, which escapes every attribute and text child, and
/// [`Markup::trusted`] for static literals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Markup(String);

impl Markup {
    pub fn text(text: &str) -> Self {
        Self(escape(text))
    }
    pub fn trusted(html: &'static str) -> Self {
        Self(html.to_string())
    }
    /// Escaped text with line breaks turned into `<br>`.
    pub fn multiline(text: &str) -> Self {
        Self(escape(text).replace('\n', "<br>"))
    }
    pub fn concat(parts: impl IntoIterator<Item = Markup>) -> Self {
        Self(parts.into_iter().map(|m| m.0).collect())
    }
    pub fn push(&mut self, markup: impl Into<Markup>) {
        self.0.push_str(&markup.into().0);
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
    #[cfg(test)]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Node> for Markup {
    fn from(node: Node) -> Self {
        node.render()
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// Element builder. Attributes keep insertion order.
#[derive(Debug, Clone)]
pub struct Node {
    tag: &'static str,
    attrs: Vec<(&'static str, Option<String>)>,
    children: Vec<Markup>,
}

pub fn el(tag: &'static str) -> Node {
    Node {
        tag,
        attrs: vec![],
        children: vec![],
    }
}

/// Bootstrap icon, `<i class="bi {name} {extra}"></i>`.
pub fn icon(name: &str, extra: &str) -> Markup {
    let class = if extra.is_empty() {
        format!("bi {name}")
    } else {
        format!("bi {name} {extra}")
    };
    el("i").class(&class).render()
}

impl Node {
    pub fn attr(mut self, name: &'static str, value: impl ToString) -> Self {
        self.attrs.push((name, Some(value.to_string())));
        self
    }
    /// Boolean attribute such as `disabled` or `required`.
    pub fn flag(mut self, name: &'static str, on: bool) -> Self {
        if on {
            self.attrs.push((name, None));
        }
        self
    }
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }
    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }
    pub fn text(mut self, text: impl AsRef<str>) -> Self {
        self.children.push(Markup::text(text.as_ref()));
        self
    }
    /// Escaped text, line breaks kept as `<br>`.
    pub fn text_multiline(mut self, text: &str) -> Self {
        self.children.push(Markup::multiline(text));
        self
    }
    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }
    pub fn children<M: Into<Markup>>(mut self, children: impl IntoIterator<Item = M>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn render(self) -> Markup {
        let mut out = format!("<{}", self.tag);
        for (name, value) in &self.attrs {
            match value {
                Some(value) => {
                    out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
                }
                None => {
                    out.push(' ');
                    out.push_str(name);
                }
            }
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag) {
            return Markup(out);
        }
        for child in self.children {
            out.push_str(&child.0);
        }
        out.push_str(&format!("</{}>", self.tag));
        Markup(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let markup = el("a")
            .attr("href", "/x?a=1&b=\"2\"")
            .text("<script>alert('x')</script>")
            .render();
        assert_eq!(
            markup.as_str(),
            "<a href=\"/x?a=1&amp;b=&quot;2&quot;\">&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</a>"
        );
    }

    #[test]
    fn void_tags_have_no_closing_tag() {
        let markup = el("input")
            .attr("type", "hidden")
            .attr("name", "posting_id")
            .attr("value", 7)
            .flag("required", false)
            .render();
        assert_eq!(
            markup.as_str(),
            "<input type=\"hidden\" name=\"posting_id\" value=\"7\">"
        );
    }

    #[test]
    fn multiline_keeps_breaks_after_escaping() {
        assert_eq!(Markup::multiline("a<b\nc").as_str(), "a&lt;b<br>c");
    }
}
