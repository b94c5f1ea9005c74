mod login;
mod register;
mod resources;
mod session;
mod users;
