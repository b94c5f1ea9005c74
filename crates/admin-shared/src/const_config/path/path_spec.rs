use reqwest::Method;

#[derive(Debug, Clone)]
pub struct PathSpec {
    pub path: &'static str,
    pub method: Method,
}

impl PathSpec {
    pub const fn get(path: &'static str) -> Self {
        Self {
            path,
            method: Method::GET,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            path,
            method: Method::POST,
        }
    }

    /// Returns the path with `segment` appended as an extra path segment
    pub fn path_with(&self, segment: impl std::fmt::Display) -> String {
        format!("{}/{segment}", self.path)
    }
}
