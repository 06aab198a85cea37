//! Tests against a real PostgreSQL instance (`TEST_DATABASE_URL`)

pub mod pages_db_test;
pub mod site_db_test;
pub mod stream_db_test;
