// Session lifecycle - who is signed in and their mirrored profile

pub mod store;

pub use store::{SessionSnapshot, SessionStore, SignUp};
