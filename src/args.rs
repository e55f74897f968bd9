use clap::{Args as ClapArgs, Parser, Subcommand};

/// This is a roster management and duty draw program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The configuration file in JSON format, with the departments, the roles and the
    /// default draw counts. See the manual for the format.
    #[clap(short, long, value_parser, global = true)]
    pub config: Option<String>,

    /// (file path, optional) The file in which the roster and the last results are kept between runs.
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(long, value_parser, global = true)]
    pub state: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Replaces the roster with the content of a spreadsheet.
    Import(ImportArgs),
    /// Writes an empty roster in CSV format, to be filled in.
    Template {
        /// (file path) Where to write the template.
        #[clap(short, long, value_parser)]
        out: String,
    },
    /// Prints the persons of the roster.
    List(FilterArgs),
    /// Prints the number of persons per status in every department.
    Stats(FilterArgs),
    /// Prints the number of available persons per position in every department.
    Availability,
    /// Changes the status of a person.
    Edit {
        /// The name of the person, as in the roster.
        #[clap(long, value_parser)]
        name: String,
        /// normal, vacation or sick.
        #[clap(long, value_parser)]
        status: String,
        /// (optional) A free text note. The current note is kept if not provided, an empty
        /// string clears it.
        #[clap(long, value_parser)]
        remark: Option<String>,
    },
    /// Draws persons in every department and replaces the previous results.
    Draw(DrawArgs),
    /// Prints the last results.
    Show,
    /// Writes the last results as a table in CSV format.
    Export {
        /// (file path) Where to write the table.
        #[clap(short, long, value_parser)]
        out: String,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ImportArgs {
    /// (file path or empty) The roster file. If not provided, the input of the configuration file is used.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (excel or csv) The type of the input. By default, it is guessed from the extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct FilterArgs {
    #[clap(long, value_parser)]
    pub department: Option<String>,
    #[clap(long, value_parser)]
    pub position: Option<String>,
    /// normal, vacation or sick.
    #[clap(long, value_parser)]
    pub status: Option<String>,
    /// Case-insensitive text searched in the names, departments and positions.
    #[clap(long, value_parser)]
    pub search: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DrawArgs {
    /// (POSITION=COUNT, repeated) The number of persons to draw for a position in every department.
    /// Overrides the draws of the configuration file.
    #[clap(long = "draw", value_parser)]
    pub draws: Vec<String>,

    /// (number, optional) Seed for the random generator, to make a draw reproducible.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    /// (file path, 'stdout' or empty) If specified, the summary of the draw will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a draw summary in JSON format. If provided, rosterdraw will
    /// check that the summary of this draw matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,
}
