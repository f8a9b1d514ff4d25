use crate::model::movie::{normalize_title, MovieRecord};

/// The user's movies, in the order they were first added.
///
/// Titles are unique: lookups ignore case and surrounding whitespace, and
/// inserting a movie whose title is already present replaces the old record in
/// place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    movies: Vec<MovieRecord>,
}

impl Collection {
    pub fn new() -> Self {
        Collection { movies: vec![] }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MovieRecord> {
        self.movies.iter()
    }

    pub fn get(&self, title: &str) -> Option<&MovieRecord> {
        self.position(title).map(|i| &self.movies[i])
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut MovieRecord> {
        self.position(title).map(move |i| &mut self.movies[i])
    }

    pub fn contains(&self, title: &str) -> bool {
        self.position(title).is_some()
    }

    /// Inserts the movie, returning the record it replaced, if any.
    pub fn upsert(&mut self, movie: MovieRecord) -> Option<MovieRecord> {
        match self.position(&movie.title) {
            Some(i) => Some(std::mem::replace(&mut self.movies[i], movie)),
            None => {
                self.movies.push(movie);
                None
            }
        }
    }

    /// Puts `movie` where the record titled `old_title` was, returning that record.
    pub fn replace(&mut self, old_title: &str, movie: MovieRecord) -> Option<MovieRecord> {
        self.position(old_title)
            .map(|i| std::mem::replace(&mut self.movies[i], movie))
    }

    pub fn remove(&mut self, title: &str) -> Option<MovieRecord> {
        self.position(title).map(|i| self.movies.remove(i))
    }

    fn position(&self, title: &str) -> Option<usize> {
        let key = normalize_title(title);
        self.movies
            .iter()
            .position(|movie| normalize_title(&movie.title) == key)
    }
}

impl FromIterator<MovieRecord> for Collection {
    fn from_iter<I: IntoIterator<Item = MovieRecord>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for movie in iter {
            collection.upsert(movie);
        }
        collection
    }
}

impl IntoIterator for Collection {
    type Item = MovieRecord;
    type IntoIter = std::vec::IntoIter<MovieRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.movies.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a MovieRecord;
    type IntoIter = std::slice::Iter<'a, MovieRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.movies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(collection: &Collection) -> Vec<&str> {
        collection.iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn keeps_insertion_order() {
        let collection: Collection = vec![
            MovieRecord::new("Zodiac", 2007, 7.7),
            MovieRecord::new("Alien", 1979, 8.5),
            MovieRecord::new("Memento", 2000, 8.4),
        ]
        .into_iter()
        .collect();

        assert_eq!(titles(&collection), vec!["Zodiac", "Alien", "Memento"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut collection = Collection::new();
        collection.upsert(MovieRecord::new("Alien", 1979, 8.5));
        collection.upsert(MovieRecord::new("Memento", 2000, 8.4));

        let replaced = collection.upsert(MovieRecord::new("ALIEN", 1979, 9.0));

        assert_eq!(replaced.map(|m| m.rating), Some(8.5));
        assert_eq!(collection.len(), 2);
        assert_eq!(titles(&collection), vec!["ALIEN", "Memento"]);
    }

    #[test]
    fn replace_keeps_position_under_a_new_title() {
        let mut collection: Collection = vec![
            MovieRecord::new("Star Wars", 1977, 8.6),
            MovieRecord::new("Alien", 1979, 8.5),
        ]
        .into_iter()
        .collect();

        let old = collection.replace(
            "star wars",
            MovieRecord::new("Star Wars: Episode IV - A New Hope", 1977, 8.6),
        );

        assert_eq!(old.map(|m| m.title), Some("Star Wars".to_string()));
        assert_eq!(
            titles(&collection),
            vec!["Star Wars: Episode IV - A New Hope", "Alien"]
        );
        assert!(collection.replace("Heat", MovieRecord::new("Heat", 1995, 8.3)).is_none());
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn remove_and_lookup_ignore_case() {
        let mut collection = Collection::new();
        collection.upsert(MovieRecord::new("Memento", 2000, 8.4));

        assert!(collection.contains(" memento"));
        assert!(collection.remove("MEMENTO").is_some());
        assert!(collection.is_empty());
        assert!(collection.remove("Memento").is_none());
    }
}
