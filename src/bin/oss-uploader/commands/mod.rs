// Command implementations

mod params;
mod upload;

pub use params::execute_params;
pub use upload::execute_upload;
