pub mod deploy;
pub mod healthcheck;
pub mod pipeline;
pub mod run;
