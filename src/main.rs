use clap::{arg, crate_version, Command};

const RCH: &str = "unreachable was reached";

fn main() -> bwthuff::STDRESULT {
    env_logger::init();

    let long_help = "Examples:
---------
Compress:      `bwthuff compress -i plain.txt -o plain.bwt`
Expand:        `bwthuff expand -i plain.bwt -o plain.txt`";

    let mut main_cmd = Command::new("bwthuff")
        .about("Compress and expand text with BWT + RLE + Huffman + Elias gamma")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(
        Command::new("compress")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .about("compress a file"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("expand")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .about("expand a file"),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let dat = std::fs::read(path_in)?;
        let compressed = bwthuff::encode(&dat)?;
        std::fs::write(path_out, compressed)?;
    }

    if let Some(cmd) = matches.subcommand_matches("expand") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let dat = std::fs::read(path_in)?;
        let expanded = bwthuff::decode(&dat)?;
        std::fs::write(path_out, expanded)?;
    }

    Ok(())
}
