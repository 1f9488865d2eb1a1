pub mod astrograph_errors;
pub mod astrometry;
pub mod camera;
pub mod constants;
pub mod engine;
pub mod erfa;
mod focal_plane;
pub mod observation;
pub mod site;
pub mod time;
