pub mod note_routes;
pub mod system_routes;
