mod context;
mod handlers;
mod paths;
mod requests;
mod responses;

pub use context::AppContext;
pub use handlers::*;
pub use paths::resolve_user_path;
pub use requests::*;
pub use responses::*;
