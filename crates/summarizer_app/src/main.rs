fn main() -> anyhow::Result<()> {
    summarizer_app::run()
}
