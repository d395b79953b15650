// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup
// - infrastructure: Postgres repositories and blob storage adapters
// - presentation: HTTP handlers and routing
// - application: access policies, ports and use cases
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
