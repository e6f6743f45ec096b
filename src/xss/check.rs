/// Unit of work flowing between pipeline stages.
///
/// `param` is empty on entry and, once set, names a key present in the
/// query string of `url`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamCheck {
    pub url: String,
    pub param: String,
}

impl ParamCheck {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            param: String::new(),
        }
    }

    pub fn with_param(url: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            param: param.into(),
        }
    }

    pub fn has_param(&self) -> bool {
        !self.param.is_empty()
    }
}
