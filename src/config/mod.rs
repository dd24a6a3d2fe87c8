//! Service Configuration Module
//!
//! All settings come from environment variables (optionally seeded from a
//! `.env` file by `main`). They are read once at startup into an
//! [`AppConfig`] that is shared read-only with every component.
//!
//! ## Variables
//!
//! | Variable            | Default                          |
//! |---------------------|----------------------------------|
//! | `ANTHROPIC_API_KEY` | none (analysis fails without it) |
//! | `ANTHROPIC_MODEL`   | `claude-3-5-sonnet-20241022`     |
//! | `ANTHROPIC_API_URL` | `https://api.anthropic.com`      |
//! | `MARKET_DATA_URL`   | placeholder, empty disables      |
//! | `SMTP_SERVER`       | `smtp.gmail.com`                 |
//! | `SMTP_PORT`         | `587`                            |
//! | `EMAIL_USER`        | none (email skipped without it)  |
//! | `EMAIL_PASSWORD`    | none (email skipped without it)  |
//! | `EMAIL_RECIPIENTS`  | empty                            |
//! | `PORT`              | `8080`                           |
//! | `TEST_MODE`         | `false`                          |
//! | `ANALYSIS_TIME`     | `05:30` (UTC)                    |

mod app_config;
pub mod defaults;

pub use app_config::*;
