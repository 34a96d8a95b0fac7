use clap::Parser;

#[derive(Debug, Parser)]
struct Opt {
    path: std::path::PathBuf,
    /// Print the start of the data of every variable
    #[arg(long)]
    data: bool,
}

fn main() {
    let opt = Opt::parse();

    match run(&opt) {
        Err(e) => {
            println!("{}", e);
            std::process::exit(1);
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}

fn run(opt: &Opt) -> Result<(), Box<dyn std::error::Error>> {
    let buf = std::fs::read(&opt.path)?;
    let file = netcdf3::open_mem(&buf)?;

    println!("{} ({})", opt.path.display(), file.version());
    if opt.data {
        println!("{file}");
        return Ok(());
    }
    print_file(&file);
    Ok(())
}

fn print_file(file: &netcdf3::File) {
    let dims = file.dimensions();
    if !dims.is_empty() {
        println!("Dimensions:");
        for d in dims {
            if d.is_unlimited() {
                let records = file.dimension_len(d.name()).unwrap_or_default();
                println!("\t{} : Unlimited ({})", d.name(), records);
            } else {
                println!("\t{} : ({})", d.name(), d.len());
            }
        }
    }

    let variables = file.variables();
    if !variables.is_empty() {
        println!("Variables:");
        for v in variables {
            print!("\t{}", v.name());
            print!("(");
            for &id in v.dimension_ids() {
                if let Some(d) = dims.get(id) {
                    print!(" {} ", d.name());
                }
            }
            println!("): {}", v.vartype());
            for a in v.attributes() {
                println!("\t\t{} = {:?}", a.name(), a.value());
            }
        }
    }

    let attributes = file.global_attributes();
    if !attributes.is_empty() {
        println!("Attributes:");
        for a in attributes {
            println!("\t\t{} = {:?}", a.name(), a.value());
        }
    }
}
