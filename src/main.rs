use std::process::exit;

use getopts::Options;
use msixpack::PackageBuilder;

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} -d <directory> -p <package>", program);
    println!("{}", opts.usage(&brief));
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = &args[0];

    let mut opts = Options::new();
    opts.reqopt("d", "directory", "directory to pack", "DIR");
    opts.reqopt("p", "package", "package file to create", "PACKAGE");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            println!("{}", failure);
            print_usage(program, &opts);
            exit(-1);
        }
    };
    let (Some(directory), Some(package)) = (matches.opt_str("d"), matches.opt_str("p")) else {
        print_usage(program, &opts);
        exit(-1);
    };

    match PackageBuilder::new(directory, package).build() {
        Ok(()) => {}
        Err(error) => {
            println!("{}", error);
            exit(1);
        }
    }
}
