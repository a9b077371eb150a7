// handlers/mod.rs - route handlers by exposure
//
// Public pages and service endpoints live under `public`; everything mounted
// under the API prefix lives under `api`. The page gate never intercepts API
// routes, so each API handler applies its own authorization where needed.

pub mod api;
pub mod public;
