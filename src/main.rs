fn main() -> anyhow::Result<std::process::ExitCode> {
    frogger_picker_lib::run()
}
