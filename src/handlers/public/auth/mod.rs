pub mod logout;

pub use logout::logout_post;
