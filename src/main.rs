// src/main.rs

use magresview::config::Config;
use magresview::error::{missing_data, Result};
use magresview::interface::{EulerInterface, SelectInterface};
use magresview::model::Structure;
use magresview::nmr::{dipolar_coupling, gyromagnetic_ratio};
use magresview::selection::{AtomId, ClickCode, ClickHandler, Modifier, SelectionMode};
use magresview::state::{Event, Store};
use magresview::tensor::TensorKind;
use magresview::utils::{color_scale, logger, report};
use std::cell::RefCell;
use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

const USAGE: &str = "\
Usage: magresview <structure.json> <command>

Commands:
  summary                              Atoms and available tensors
  table                                MS to EFG Euler angles of the primary cell
  euler <i> <j> [kind_a] [kind_b]      Euler angles between tensors of atoms i and j
  dipolar <i> <j>                      Dipolar coupling between atoms i and j
  cscale <ms|efg>                      Colour of each atom by tensor isotropy
  select <mode> <modifier> <atom>...   Replay clicks and print the selection";

enum Command {
    Summary,
    Table,
    Euler {
        a: AtomId,
        b: AtomId,
        kind_a: Option<String>,
        kind_b: Option<String>,
    },
    Dipolar { a: AtomId, b: AtomId },
    ColorScale { kind: String },
    Select {
        mode: String,
        modifier: String,
        clicks: Vec<AtomId>,
    },
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        let (name, rest) = args.split_first()?;
        let atom = |i: usize| rest.get(i)?.parse::<AtomId>().ok();

        match name.as_str() {
            "summary" => Some(Command::Summary),
            "table" => Some(Command::Table),
            "euler" => Some(Command::Euler {
                a: atom(0)?,
                b: atom(1)?,
                kind_a: rest.get(2).cloned(),
                kind_b: rest.get(3).cloned(),
            }),
            "dipolar" => Some(Command::Dipolar {
                a: atom(0)?,
                b: atom(1)?,
            }),
            "cscale" => Some(Command::ColorScale {
                kind: rest.first()?.clone(),
            }),
            "select" => {
                let clicks = rest
                    .iter()
                    .skip(2)
                    .map(|s| s.parse::<AtomId>().ok())
                    .collect::<Option<Vec<_>>>()?;
                Some(Command::Select {
                    mode: rest.first()?.clone(),
                    modifier: rest.get(1)?.clone(),
                    clicks,
                })
            }
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    let _ = logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (Some(path), Some(cmd)) = (args.first(), args.get(1..).and_then(Command::parse)) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let (config, msg) = Config::load();
    log::info!("{}", msg);

    match run(Path::new(path), cmd, &config) {
        Ok(out) => {
            print!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path, cmd: Command, config: &Config) -> Result<String> {
    let structure = Rc::new(Structure::load(path, config.bond_tolerance)?);

    let store = Rc::new(RefCell::new(Store::default()));
    let clicks = Rc::new(RefCell::new(ClickHandler::new()));
    let select = SelectInterface::new(store.clone(), clicks.clone(), structure.clone());
    select.reset_default_display();

    let euler = EulerInterface::new(store.clone());
    euler.set_convention(config.euler_convention.tag())?;

    match cmd {
        Command::Summary => {
            let name = path.file_name().map_or_else(String::new, |n| n.to_string_lossy().into_owned());
            Ok(report::structure_summary(
                &structure,
                &name,
                config.table_width,
                config.table_precision,
            ))
        }

        Command::Table => euler.txt_self_angle_table(
            &structure,
            &select.selected(),
            &select.displayed(),
            config.table_width,
            config.table_precision,
        ),

        Command::Euler {
            a,
            b,
            kind_a,
            kind_b,
        } => {
            if let Some(k) = kind_a {
                euler.set_tensor_a(&k)?;
            }
            if let Some(k) = kind_b {
                euler.set_tensor_b(&k)?;
            }

            euler.bind(&mut clicks.borrow_mut());
            clicks.borrow_mut().fire(ClickCode::LeftClick, a);
            clicks.borrow_mut().fire(ClickCode::RightClick, b);
            if store.borrow_mut().take_events().contains(&Event::EulAngles) {
                euler.refresh(&structure)?;
            }
            Ok(euler.txt_report(&structure))
        }

        Command::Dipolar { a, b } => {
            let (Some(atom_a), Some(atom_b)) = (structure.atom(a), structure.atom(b)) else {
                return Err(missing_data(&format!("no atom pair {} {}", a, b)));
            };
            let gamma = |el: &str| {
                gyromagnetic_ratio(el).ok_or_else(|| missing_data(&format!("no gyromagnetic ratio for {}", el)))
            };
            let (d, v) = dipolar_coupling(
                atom_a.position,
                gamma(&atom_a.element)?,
                atom_b.position,
                gamma(&atom_b.element)?,
            );
            Ok(format!(
                "Dipolar coupling {} - {}: {:.3} kHz\nDirection: [{:.5}, {:.5}, {:.5}]\n",
                atom_a.label,
                atom_b.label,
                d / 1e3,
                v[0],
                v[1],
                v[2]
            ))
        }

        Command::ColorScale { kind } => {
            let kind: TensorKind = kind.parse()?;
            let values: Vec<(&str, f64)> = structure
                .atoms
                .iter()
                .filter_map(|a| a.tensor(kind).map(|t| (a.label.as_str(), t.isotropy())))
                .collect();
            if values.is_empty() {
                return Err(missing_data(&format!("no {} tensors", kind)));
            }

            let min = values.iter().map(|v| v.1).fold(f64::INFINITY, f64::min);
            let max = values.iter().map(|v| v.1).fold(f64::NEG_INFINITY, f64::max);
            let scale = color_scale(min, max, config.colormap, config.cscale_shades);

            let mut out = String::new();
            for (label, iso) in values {
                out.push_str(&format!("{:<8} {:>14.5} {}\n", label, iso, scale.hex_at(iso)));
            }
            Ok(out)
        }

        Command::Select {
            mode,
            modifier,
            clicks: atoms,
        } => {
            let mode = config.apply_defaults(mode.parse::<SelectionMode>()?);
            let modifier: Modifier = modifier.parse()?;
            select.set_select(mode);

            for atom in atoms {
                clicks.borrow_mut().fire(modifier.click_code(), atom);
            }
            let labels: Vec<&str> = select
                .selected()
                .into_iter()
                .filter_map(|i| structure.atom(i).map(|a| a.label.as_str()))
                .collect();
            Ok(format!("Selected ({}): {}\n", labels.len(), labels.join(" ")))
        }
    }
}
