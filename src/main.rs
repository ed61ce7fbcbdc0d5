use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    citas_lib::run().await
}
