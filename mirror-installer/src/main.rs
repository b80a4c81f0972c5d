fn main() -> anyhow::Result<()> {
    mirror_installer::run()
}
