use crate::error::ExecError;
use crate::option::OptionItem;
use crate::runner::CommandRunner;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    /// Write the command line to stdout.
    Print,
    Execute,
}

pub async fn handle_output(
    runner: &CommandRunner,
    items: Vec<OptionItem>,
    mode: OutputMode,
) -> Result<(), ExecError> {
    match mode {
        OutputMode::Print => {
            println!("{}", runner.build(items));
        }
        OutputMode::Execute => {
            runner.exec(items).await?;
        }
    }
    Ok(())
}
