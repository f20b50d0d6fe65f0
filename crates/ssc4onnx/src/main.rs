use std::{io, path::PathBuf, process};

use ssc4onnx::{CheckError, StructureCheck, Style};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "ssc4onnx", about = "Structure check for ONNX models")]
struct Opt {
    #[structopt(
        long = "input_onnx_file_path",
        help = "Input onnx file path.",
        parse(from_os_str)
    )]
    input_onnx_file_path: PathBuf,
}

fn main() -> Result<(), CheckError> {
    env_logger::init();
    color_backtrace::install();

    let opt = Opt::from_args();
    let res = StructureCheck::new()
        .with_input_path(opt.input_onnx_file_path)
        .with_style(Style::for_stdout())
        .run(&mut io::stdout().lock());

    match res {
        Err(CheckError::MissingInput) => {
            eprintln!("{} {}", Style::for_stderr().error(), CheckError::MissingInput);
            process::exit(1);
        }
        res => res,
    }
}
