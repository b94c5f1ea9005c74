//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub mod client {
    /// Used when no api url is configured
    pub const CLIENT_DEFAULT_API_URL: &str = "https://localhost:7078/api";

    /// Where the UI should send the user after the session has been torn down
    pub const CLIENT_LOGIN_REDIRECT: &str = "/login";
}

pub mod user {
    /// Role assigned when a registration does not specify one and used when
    /// the backend returns a user without any roles
    pub const USER_DEFAULT_ROLE: &str = "user";
    pub const USER_MIN_PASSWORD_LENGTH: usize = 6;
}

pub mod resource {
    /// Name of the resource that gets its own request and response mapping
    pub const RESOURCE_USERS: &str = "users";
    pub const RESOURCE_TOTAL_COUNT_HEADER: &str = "X-Total-Count";
}

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_AUTH_LOGIN: PathSpec = PathSpec::post("/auth/login");
    pub const PATH_AUTH_REGISTER: PathSpec = PathSpec::post("/auth/register");
    pub const PATH_AUTH_USERS: PathSpec = PathSpec::get("/auth/users");
    /// The user id is appended to this path
    pub const PATH_AUTH_USER: PathSpec = PathSpec::get("/auth/user");
}
