pub mod basic;
pub mod config_schema;
pub mod manifest;

pub use basic::BasicArgs;
pub use config_schema::ConfigSchemaArgs;
pub use manifest::ManifestArgs;

/// Prints each failure on its own line and mirrors it to the report log.
pub fn report(result: Result<(), vet::Errors>) -> usize {
    let failures = vet::errors(result);
    for failure in &failures {
        tracing::debug!(
            target: vet_otel::REPORT_TARGET,
            path = %failure.path,
            message = %failure.message,
            "validation failure"
        );
        println!("{failure}");
    }
    failures.len()
}
