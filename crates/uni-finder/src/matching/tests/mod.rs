mod common;
mod pipeline;
mod properties;
