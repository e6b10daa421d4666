// Details screen services
// Services talk to the outside world: the remote API and the settings file.

pub mod remote_repository;
pub mod settings_engine;
