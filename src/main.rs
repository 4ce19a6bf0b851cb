fn main() -> anyhow::Result<()> {
    hecate_installer::app::run()
}
