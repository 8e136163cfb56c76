#![allow(unused_crate_dependencies, clippy::panic)]

mod mock;

#[ctor::ctor]
fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::builder()
        .parse(std::env::var("RUST_LOG").unwrap_or_else(|_| "graphql_test_client=debug".to_owned()))
        .unwrap();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .without_time()
        .init();
}
