use anyhow::Result;
use clap::Parser;
use hourglass::HourglassModel;
use log::info;
use model_config::HourglassConfig;
use model_graph::Graph;
use prettytable::{cell, row, Table};
use std::path::{Path, PathBuf};
use tch::{nn, Device, Kind, Tensor};

#[derive(Debug, Clone, Parser)]
enum Opts {
    /// Print the declared nodes of the network.
    Info {
        /// configuration file, the reference network if omitted
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Render the network in Graphviz DOT format.
    MakeDotFile {
        /// configuration file, the reference network if omitted
        #[clap(long)]
        config: Option<PathBuf>,
        /// output DOT file
        output_file: PathBuf,
    },
    /// Instantiate the model and run a forward pass on zeros.
    DryRun {
        /// configuration file, the reference network if omitted
        #[clap(long)]
        config: Option<PathBuf>,
        #[clap(long, default_value = "1")]
        batch_size: i64,
        /// run on the first CUDA device if available
        #[clap(long)]
        cuda: bool,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Opts::parse() {
        Opts::Info { config } => {
            info(config)?;
        }
        Opts::MakeDotFile {
            config,
            output_file,
        } => {
            make_dot_file(config, output_file)?;
        }
        Opts::DryRun {
            config,
            batch_size,
            cuda,
        } => {
            dry_run(config, batch_size, cuda)?;
        }
    }

    Ok(())
}

fn load_config(config_file: Option<impl AsRef<Path>>) -> Result<HourglassConfig> {
    let config = match config_file {
        Some(path) => HourglassConfig::load(path)?,
        None => HourglassConfig::default(),
    };
    Ok(config)
}

fn info(config_file: Option<impl AsRef<Path>>) -> Result<()> {
    let config = load_config(config_file)?;
    let graph = Graph::hourglass(&config)?;
    let nodes = graph.nodes();

    // print layer information
    {
        let mut table = Table::new();
        table.add_row(row!["key", "kind", "path", "input_keys", "output shape"]);

        nodes.iter().for_each(|(&key, node)| {
            table.add_row(row![
                key,
                node.config.as_ref(),
                node.path,
                format!("{:?}", node.input_keys),
                node.output_shape,
            ]);
        });

        table.printstd();
    }

    // print totals
    {
        let mut table = Table::new();
        table.add_row(row!["nodes", graph.num_nodes()]);
        table.add_row(row!["parameters", graph.num_parameters()?]);
        table.add_row(row!["output shape", graph.output_shape()]);
        table.add_row(row!["auxiliary outputs", graph.auxiliary_keys().len()]);
        table.add_row(row!["trainable", graph.trainable()]);
        table.printstd();
    }

    Ok(())
}

#[cfg(feature = "dot")]
fn make_dot_file(
    config_file: Option<impl AsRef<Path>>,
    output_file: impl AsRef<Path>,
) -> Result<()> {
    use std::{fs::File, io::BufWriter};

    let config = load_config(config_file)?;
    let graph = Graph::hourglass(&config)?;
    let output_file = output_file.as_ref();
    let mut writer = BufWriter::new(File::create(output_file)?);
    graph.render_dot(&mut writer)?;
    info!("wrote graph to '{}'", output_file.display());
    Ok(())
}

#[cfg(not(feature = "dot"))]
fn make_dot_file(
    _config_file: Option<impl AsRef<Path>>,
    _output_file: impl AsRef<Path>,
) -> Result<()> {
    use anyhow::bail;
    bail!("'dot' feature must be enabled to run this command");
}

fn dry_run(config_file: Option<impl AsRef<Path>>, batch_size: i64, cuda: bool) -> Result<()> {
    anyhow::ensure!(batch_size > 0, "batch size must be positive");

    let config = load_config(config_file)?;
    let device = if cuda {
        Device::cuda_if_available()
    } else {
        Device::Cpu
    };
    info!("using device {:?}", device);

    let vs = nn::VarStore::new(device);
    let model = HourglassModel::new(&vs.root(), &config)?;

    let model_config::InputSize { h, w, c } = config.input;
    let input = Tensor::zeros(
        &[batch_size, c as i64, h as i64, w as i64],
        (Kind::Float, device),
    );
    let output = tch::no_grad(|| model.forward_t(&input, false))?;

    info!("output shape {:?}", output.output.size());
    output
        .auxiliary
        .iter()
        .enumerate()
        .for_each(|(index, aux)| info!("auxiliary output {} shape {:?}", index, aux.size()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "dot")]
    fn make_dot_file_writes_graph() -> Result<()> {
        let output_file = std::env::temp_dir().join("hourglass-tool-test.dot");
        make_dot_file(None::<&Path>, &output_file)?;
        let text = std::fs::read_to_string(&output_file)?;
        assert!(text.starts_with("digraph hourglass"));
        std::fs::remove_file(&output_file)?;
        Ok(())
    }

    #[test]
    #[cfg(not(feature = "dot"))]
    fn make_dot_file_requires_dot_feature() {
        let output_file = std::env::temp_dir().join("hourglass-tool-test.dot");
        assert!(make_dot_file(None::<&Path>, &output_file).is_err());
        assert!(!output_file.exists());
    }
}
