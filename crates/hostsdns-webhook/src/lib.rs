// # hostsdns-webhook
//
// HTTP surface of the hosts-file provider, speaking the external-dns
// webhook provider protocol.
//
// | Method | Path               | Success                     |
// |--------|--------------------|-----------------------------|
// | GET    | `/`                | 200, domain filter          |
// | GET    | `/records`         | 200, endpoints              |
// | POST   | `/records`         | 204                         |
// | POST   | `/adjustendpoints` | 200, endpoints echoed       |
// | any    | `/healthz`         | 200, `ok`                   |
//
// Wrong methods on the first three paths get 405, undecodable bodies get
// 400, and hosts-file failures get 500, each with the error text as a
// plain-text body.

pub mod error;
pub mod routes;
pub mod server;

pub use error::WebhookError;
pub use routes::{SharedProvider, create_router};
pub use server::{ServerHandle, serve, start_server};
