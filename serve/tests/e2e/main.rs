mod assistant_stream;
mod health;
mod run_failure;
