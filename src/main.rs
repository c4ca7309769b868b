use rask_log_parser::app;

fn main() -> anyhow::Result<()> {
    app::run()
}
