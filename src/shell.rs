use std::io::{BufRead, Write};

use crate::{
    clients::omdb_client::MetadataFetcher,
    error::{AppResult, MovieAppError},
    manager::CollectionManager,
    model::movie::MovieRecord,
    persisters::storage::Storage,
    site_generator::SiteGenerator,
};

const MENU: [(&str, &str); 8] = [
    ("0", "Exit"),
    ("1", "List movies"),
    ("2", "Add movie"),
    ("3", "Delete movie"),
    ("4", "Update movie"),
    ("5", "Search movie"),
    ("6", "Movie stats"),
    ("7", "Generate website"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Exit,
    List,
    Add,
    Delete,
    Update,
    Search,
    Stats,
    Generate,
}

impl Command {
    fn parse(choice: &str) -> Option<Command> {
        match choice.trim() {
            "0" => Some(Command::Exit),
            "1" => Some(Command::List),
            "2" => Some(Command::Add),
            "3" => Some(Command::Delete),
            "4" => Some(Command::Update),
            "5" => Some(Command::Search),
            "6" => Some(Command::Stats),
            "7" => Some(Command::Generate),
            _ => None,
        }
    }
}

/// The interactive menu. Reads commands from `input` until "0" or end of
/// input, and reports every failure to `output` instead of stopping.
pub struct Shell<S, F, R, W> {
    manager: CollectionManager<S, F>,
    site: SiteGenerator,
    input: R,
    output: W,
}

impl<S, F, R, W> Shell<S, F, R, W>
where
    S: Storage,
    F: MetadataFetcher,
    R: BufRead,
    W: Write,
{
    pub fn new(manager: CollectionManager<S, F>, site: SiteGenerator, input: R, output: W) -> Self {
        Shell {
            manager,
            site,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub async fn run(&mut self) -> AppResult<()> {
        writeln!(self.output, "********** My Movies Database **********")?;
        writeln!(
            self.output,
            "Add movies, delete them and add notes. See it all on the web!"
        )?;

        loop {
            self.print_menu()?;
            let choice = match self.prompt(&format!("Enter choice (0-{}): ", MENU.len() - 1))? {
                Some(choice) => choice,
                None => break,
            };

            let command = match Command::parse(&choice) {
                Some(command) => command,
                None => {
                    writeln!(
                        self.output,
                        "Invalid choice '{}'. Please pick a number from the menu.",
                        choice
                    )?;
                    continue;
                }
            };
            if command == Command::Exit {
                break;
            }

            match self.execute(command).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    log::debug!("Command {:?} failed: {:?}", command, e);
                    writeln!(self.output, "Error: {}", e)?;
                }
            }
            writeln!(self.output)?;
        }

        writeln!(self.output, "Bye!")?;
        Ok(())
    }

    /// Returns `Ok(false)` when input ran out mid-command.
    async fn execute(&mut self, command: Command) -> AppResult<bool> {
        match command {
            Command::Exit => return Ok(false),
            Command::List => self.list()?,
            Command::Add => {
                let Some(title) = self.prompt("Enter new movie name: ")? else {
                    return Ok(false);
                };
                let movie = self.manager.add(&title).await?;
                writeln!(
                    self.output,
                    "Movie '{}' ({}) added successfully!",
                    movie.title, movie.year
                )?;
            }
            Command::Delete => {
                let Some(title) = self.prompt("Enter movie name to delete: ")? else {
                    return Ok(false);
                };
                let removed = self.manager.delete(&title)?;
                writeln!(self.output, "Movie '{}' successfully deleted.", removed.title)?;
            }
            Command::Update => {
                let Some(title) = self.prompt("Enter movie name: ")? else {
                    return Ok(false);
                };
                // Fail before asking for a note the user would type in vain.
                if !self.manager.list()?.contains(&title) {
                    return Err(MovieAppError::NotFound(title.trim().to_string()));
                }
                let Some(note) = self.prompt("Enter movie notes: ")? else {
                    return Ok(false);
                };
                let movie = self.manager.update(&title, &note)?;
                writeln!(self.output, "Movie '{}' successfully updated.", movie.title)?;
            }
            Command::Search => {
                let Some(query) = self.prompt("Enter part of movie name: ")? else {
                    return Ok(false);
                };
                let found = self.manager.search(&query)?;
                if found.is_empty() {
                    writeln!(self.output, "No movies found matching '{}'.", query.trim())?;
                }
                for movie in &found {
                    self.print_movie(movie)?;
                }
            }
            Command::Stats => self.stats()?,
            Command::Generate => {
                let collection = self.manager.list()?;
                let path = self.site.generate(&collection)?;
                writeln!(
                    self.output,
                    "Website was generated successfully at {}.",
                    path.display()
                )?;
            }
        }
        Ok(true)
    }

    fn list(&mut self) -> AppResult<()> {
        let collection = self.manager.list()?;
        if collection.is_empty() {
            writeln!(self.output, "No movies in the collection yet.")?;
            return Ok(());
        }
        writeln!(self.output, "{} movies in total", collection.len())?;
        for movie in &collection {
            self.print_movie(movie)?;
        }
        Ok(())
    }

    fn stats(&mut self) -> AppResult<()> {
        let stats = self.manager.stats()?;
        let (Some(average), Some(median)) = (stats.average_rating, stats.median_rating) else {
            writeln!(self.output, "No movies in the collection yet.")?;
            return Ok(());
        };
        writeln!(self.output, "Number of movies: {}", stats.count)?;
        writeln!(self.output, "Average rating: {:.1}", average)?;
        writeln!(self.output, "Median rating: {:.1}", median)?;
        writeln!(self.output, "Best movie(s): {}", stats.best.join(", "))?;
        writeln!(self.output, "Worst movie(s): {}", stats.worst.join(", "))?;
        Ok(())
    }

    fn print_movie(&mut self, movie: &MovieRecord) -> AppResult<()> {
        write!(
            self.output,
            "{} ({}): {:.1}",
            movie.title, movie.year, movie.rating
        )?;
        if let Some(note) = &movie.note {
            write!(self.output, " - {}", note)?;
        }
        writeln!(self.output)?;
        if let Some(url) = movie.imdb_url() {
            writeln!(self.output, "    IMDb: {}", url)?;
        }
        Ok(())
    }

    fn print_menu(&mut self) -> AppResult<()> {
        writeln!(self.output, "Menu:")?;
        for (key, label) in MENU {
            writeln!(self.output, "{}. {}", key, label)?;
        }
        Ok(())
    }

    /// `None` once the input is exhausted.
    fn prompt(&mut self, message: &str) -> AppResult<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
