use std::path::PathBuf;

use dsdiff_format::TextEncoding;
use structopt::clap::AppSettings::*;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "dsdiff",
    about = "Inspect the metadata of DSDIFF audio files.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands]
)]
pub struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    pub verbose: bool,

    #[structopt(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, StructOpt)]
pub enum Commands {
    #[structopt(name = "info", visible_alias = "i", about = "Show the metadata of .dff files")]
    Info(InfoArgs),

    #[structopt(name = "tree", visible_alias = "t", about = "Show the chunks of a .dff file")]
    Tree(TreeArgs),
}

#[derive(Debug, StructOpt)]
pub struct InfoArgs {
    #[structopt(short, long, help = "Recursively handle provided directories")]
    pub recursive: bool,

    #[structopt(long, help = "Print a JSON document instead of a report")]
    pub json: bool,

    #[structopt(
        short = "E",
        long,
        default_value = "utf8",
        possible_values = TextEncoding::available_variants(),
        case_insensitive = true,
        help = "Encoding of comments, artist and title"
    )]
    pub encoding: TextEncoding,

    #[structopt(
        name = "files",
        parse(from_os_str),
        required = true,
        help = "Files or directories to inspect"
    )]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub struct TreeArgs {
    #[structopt(name = "file", parse(from_os_str), help = "Path to the .dff file")]
    pub path: PathBuf,
}
