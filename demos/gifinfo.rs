//! Prints the block structure of a GIF file.
//!
//! Basic usage: `cargo run --example gifinfo -- GIF_FILE`
//!
//! Set `RUST_LOG=trace` to watch the parser walk the stream.

use clap::{ArgEnum, Parser};
use gifblocks::{ByteIterator, GifComponent, GifInfo, LoopCount, ParseOptions, Strictness};
use std::{fs, path::PathBuf, process::ExitCode};

#[derive(Copy, Clone, PartialEq, Eq, ArgEnum)]
enum Mode {
    Strict,
    Lenient,
}

#[derive(Parser)]
struct Args {
    /// How to treat streams that bend the format
    #[clap(long, arg_enum, default_value = "lenient")]
    mode: Mode,

    /// GIF file
    gif_file: PathBuf,
}

fn describe(loop_count: Option<LoopCount>) -> String {
    match loop_count {
        None => "not set".into(),
        Some(LoopCount::Infinite) => "forever".into(),
        Some(LoopCount::NoRepeat) => "once".into(),
        Some(LoopCount::Times(n)) => format!("{} times", n),
    }
}

fn print_info(gif_info: &GifInfo) {
    let screen = gif_info.screen();
    println!(
        "GIF{} {}x{}, {} global colors",
        String::from_utf8_lossy(&gif_info.header().version),
        screen.width,
        screen.height,
        screen.color_table_len()
    );
    for extension in gif_info.application_extensions() {
        println!(
            "application extension {}{} ({} data blocks)",
            extension.application_identifier(),
            extension.authentication_code(),
            extension.application_data().len()
        );
    }
    println!("loops: {}", describe(gif_info.loop_count()));
    for comment in gif_info.comments() {
        println!("comment: {}", comment);
    }
    for (idx, (frame, delay)) in gif_info
        .frames()
        .iter()
        .zip(gif_info.frame_delays_ms())
        .enumerate()
    {
        let d = &frame.descriptor;
        println!(
            "frame {:>4} @ {:#08x}: {}x{}+{}+{} {}ms{}{}",
            idx,
            frame.offset,
            d.width,
            d.height,
            d.left,
            d.top,
            delay,
            if d.interlaced { " interlaced" } else { "" },
            if frame.local_table.is_some() {
                " local colors"
            } else {
                ""
            },
        );
    }
    for diagnostic in gif_info.status().diagnostics() {
        println!("warning: {}", diagnostic.message);
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let data = match fs::read(&args.gif_file) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("{}: {}", args.gif_file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let strictness = match args.mode {
        Mode::Strict => Strictness::Strict,
        Mode::Lenient => Strictness::Lenient,
    };
    let options = ParseOptions::new().with_strictness(strictness);
    let gif_info = match GifInfo::parser(&mut ByteIterator::from_slice(&data), &options) {
        Ok(gif_info) => gif_info,
        Err(err) => {
            eprintln!("{}: {}", args.gif_file.display(), err);
            return ExitCode::FAILURE;
        }
    };
    print_info(&gif_info);
    ExitCode::SUCCESS
}
