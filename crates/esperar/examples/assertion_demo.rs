//! Example: Assertion Demo
//!
//! Demonstrates: the expect matcher DSL and the sequential test runner
//!
//! Run with: `cargo run --example assertion_demo`

use esperar::prelude::*;
use serde_json::json;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut runner = Runner::stdout();

    runner.test("adds two numbers", || expect(1 + 2).to_be(3));

    // Reports a failure with an expected/actual diff.
    runner.test("subtracts two numbers", || expect(1 - 2).to_be(4));

    runner.test("calls a dangerous function", || {
        let danger = Value::func(|| Err(Thrown::error("Danger!")));
        expect(danger).to_throw()
    });

    runner.it("chains negation", || expect([1, 2, 3]).not().to_contain(5));

    runner.test("compares with tolerance", || {
        expect(0.1 + 0.2).to_be_close_to(0.3, 0.0001)
    });

    runner.test("inspects structured subjects", || {
        let config = json!({"retries": 3, "verbose": true});
        expect(config.clone()).to_contain_key("retries")?;
        expect(config.clone()).to_contain_entry(("retries", 3))?;
        expect(config).to_be_instance_of(Kind::Map)
    });

    // Reports a failure with a raw trace, no diff block.
    runner.test("survives a panicking body", || panic!("boom"));

    runner.test("still runs after failures", || {
        expect("esperar").to_contain("pera")
    });
}
