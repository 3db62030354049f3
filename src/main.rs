use anyhow::{bail, Context, Result};

use expedition_solvers::{pressure, valley};

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [puzzle, path] = &args[..] else {
        bail!("usage: expedition_solvers <pressure|valley> <input-file>");
    };
    let input =
        std::fs::read_to_string(path).with_context(|| format!("could not read {path}"))?;

    let (one, two) = match puzzle.as_str() {
        "pressure" => pressure::answers(&input)
            .with_context(|| format!("{path} is not a valve network"))?,
        "valley" => valley::answers(&input)
            .with_context(|| format!("{path} is not a crossable valley"))?,
        other => bail!("unknown puzzle {other:?}, expected \"pressure\" or \"valley\""),
    };
    println!("one: {one}");
    println!("two: {two}");
    Ok(())
}
