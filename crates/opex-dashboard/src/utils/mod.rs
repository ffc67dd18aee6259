pub mod endpoint_key;
pub mod input;
pub mod sanitize;
pub mod uri;

pub(crate) use endpoint_key::EndpointKey;
pub(crate) use input::{STDIN_LOCATION, read_stdin};
pub(crate) use sanitize::resource_name;
pub(crate) use uri::{join_paths, uri_to_regex};
