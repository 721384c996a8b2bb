mod cli;

use settings_loader::context::Context;
use settings_loader::loader::XmlLoader;
use settings_loader::xml_documents::XmlDocument;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("SETTINGS_LOADER_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Load(load_cli) => load(load_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn load(cli: cli::LoadCommand) -> anyhow::Result<()> {
    let documents = parse_inputs(&cli.input)?;

    let mut settings: Vec<Context> = Vec::new();
    for document in documents {
        let mut loader = XmlLoader::new(document);
        loader.load();

        for warning in loader.diagnostics().warnings() {
            eprintln!("warning: {warning}");
        }

        settings.extend(loader.settings().iter().cloned());
    }

    output(&cli.output, &settings)?;
    Ok(())
}

fn parse_inputs(input: &cli::InputArgs) -> anyhow::Result<Vec<XmlDocument>> {
    if input.files.is_empty() {
        let stdin = std::io::read_to_string(std::io::stdin())?;
        let document = settings_loader::xml_documents::parse(&stdin)?;
        return Ok(vec![document]);
    }

    let mut documents = Vec::new();
    for file_path in &input.files {
        documents.push(XmlDocument::load_file(file_path)?);
    }

    Ok(documents)
}

fn output(output: &cli::OutputArgs, settings: &[Context]) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), settings)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), settings)?,
    };

    Ok(())
}

/// (settings-loader-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    match cli.command {
        Documents(input) => {
            let documents = parse_inputs(&input)?;
            println!("{documents:#?}");
        }
        Settings(input) => {
            for document in parse_inputs(&input)? {
                let mut loader = XmlLoader::new(document);
                loader.load();
                println!("{:#?}", loader.settings());
                println!("{:#?}", loader.diagnostics());
            }
        }
    }

    Ok(())
}
