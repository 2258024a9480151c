fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = pjr2iif::args::parse();
    pjr2iif::cli::main(args)
}
