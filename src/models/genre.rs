use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// TMDB movie genre ids
///
/// Source: https://api.themoviedb.org/3/genre/movie/list
pub mod catalog_ids {
    pub const ACTION: u32 = 28;
    pub const ADVENTURE: u32 = 12;
    pub const ANIMATION: u32 = 16;
    pub const COMEDY: u32 = 35;
    pub const CRIME: u32 = 80;
    pub const DOCUMENTARY: u32 = 99;
    pub const DRAMA: u32 = 18;
    pub const FAMILY: u32 = 10751;
    pub const FANTASY: u32 = 14;
    pub const HISTORY: u32 = 36;
    pub const HORROR: u32 = 27;
    pub const MUSIC: u32 = 10402;
    pub const MYSTERY: u32 = 9648;
    pub const ROMANCE: u32 = 10749;
    pub const SCIENCE_FICTION: u32 = 878;
    pub const TV_MOVIE: u32 = 10770;
    pub const THRILLER: u32 = 53;
    pub const WAR: u32 = 10752;
    pub const WESTERN: u32 = 37;
}

/// A genre a voter can rate
///
/// Declaration order is significant: it is the stable tie-break order used
/// whenever genres with equal averages are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Biography,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Family,
    Fantasy,
    #[serde(rename = "Film-Noir")]
    FilmNoir,
    #[serde(rename = "Game-Show")]
    GameShow,
    History,
    Horror,
    Music,
    Musical,
    Mystery,
    News,
    #[serde(rename = "Reality-TV")]
    RealityTv,
    Romance,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Short,
    Sport,
    #[serde(rename = "Talk-Show")]
    TalkShow,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// Every genre, in declaration order
    pub const ALL: [Genre; 27] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Biography,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Family,
        Genre::Fantasy,
        Genre::FilmNoir,
        Genre::GameShow,
        Genre::History,
        Genre::Horror,
        Genre::Music,
        Genre::Musical,
        Genre::Mystery,
        Genre::News,
        Genre::RealityTv,
        Genre::Romance,
        Genre::SciFi,
        Genre::Short,
        Genre::Sport,
        Genre::TalkShow,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Animation => "Animation",
            Genre::Biography => "Biography",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Family => "Family",
            Genre::Fantasy => "Fantasy",
            Genre::FilmNoir => "Film-Noir",
            Genre::GameShow => "Game-Show",
            Genre::History => "History",
            Genre::Horror => "Horror",
            Genre::Music => "Music",
            Genre::Musical => "Musical",
            Genre::Mystery => "Mystery",
            Genre::News => "News",
            Genre::RealityTv => "Reality-TV",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Short => "Short",
            Genre::Sport => "Sport",
            Genre::TalkShow => "Talk-Show",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
            Genre::Western => "Western",
        }
    }

    /// Case-insensitive lookup by display name
    pub fn from_name(name: &str) -> Option<Genre> {
        let name = name.trim();
        Genre::ALL
            .into_iter()
            .find(|genre| genre.name().eq_ignore_ascii_case(name))
    }

    /// Catalog genre ids this genre maps onto. Empty for TV-only formats.
    pub fn catalog_ids(&self) -> &'static [u32] {
        use catalog_ids::*;
        match self {
            Genre::Action => &[ACTION],
            Genre::Adventure => &[ADVENTURE],
            Genre::Animation => &[ANIMATION],
            // No Biography genre upstream
            Genre::Biography => &[HISTORY, DRAMA],
            Genre::Comedy => &[COMEDY],
            Genre::Crime => &[CRIME],
            Genre::Documentary => &[DOCUMENTARY],
            Genre::Drama => &[DRAMA],
            Genre::Family => &[FAMILY],
            Genre::Fantasy => &[FANTASY],
            Genre::FilmNoir => &[CRIME, THRILLER],
            Genre::History => &[HISTORY],
            Genre::Horror => &[HORROR],
            Genre::Music | Genre::Musical => &[MUSIC],
            Genre::Mystery => &[MYSTERY],
            Genre::Romance => &[ROMANCE],
            Genre::SciFi => &[SCIENCE_FICTION],
            Genre::Sport => &[DRAMA],
            Genre::Thriller => &[THRILLER],
            Genre::War => &[WAR],
            Genre::Western => &[WESTERN],
            Genre::GameShow | Genre::News | Genre::RealityTv | Genre::Short | Genre::TalkShow => {
                &[]
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Genre::Action => {
                "High-energy films with fights, chases, explosions, and physical stunts."
            }
            Genre::Adventure => "Exciting journeys and quests, often in exotic locations.",
            Genre::Animation => {
                "Animated films using 2D, 3D, or stop-motion, for kids and adults alike."
            }
            Genre::Biography => "True stories about real people's lives.",
            Genre::Comedy => "Films designed to make you laugh, from slapstick to dark humor.",
            Genre::Crime => "Stories involving criminals, heists, or law enforcement.",
            Genre::Documentary => "Non-fiction films exploring real events, people, or topics.",
            Genre::Drama => {
                "Serious, plot-driven stories with realistic characters and emotional themes."
            }
            Genre::Family => "Films suitable for all ages, often with positive messages.",
            Genre::Fantasy => "Magical worlds with supernatural elements.",
            Genre::FilmNoir => {
                "Dark, stylized crime dramas with cynical heroes and femmes fatales."
            }
            Genre::GameShow => "Televised competitions where contestants play games for prizes.",
            Genre::History => "Period pieces depicting historical events.",
            Genre::Horror => {
                "Scary movies built to frighten, from slashers to psychological horror."
            }
            Genre::Music => "Films where music is central to the story, including concert films.",
            Genre::Musical => "Movies where characters sing and dance to advance the plot.",
            Genre::Mystery => "Puzzle-solving films with secrets to uncover.",
            Genre::News => "Broadcast journalism and news programs.",
            Genre::RealityTv => "Unscripted shows featuring real people.",
            Genre::Romance => "Love stories and relationships as the central theme.",
            Genre::SciFi => "Futuristic concepts, space, technology, or alternate realities.",
            Genre::Short => "Films typically under 40 minutes, often experimental.",
            Genre::Sport => "Athletics-focused films about athletes, teams, or sporting events.",
            Genre::TalkShow => "Interview-format programs with hosts and guests.",
            Genre::Thriller => "Suspenseful films full of tension, twists, and danger.",
            Genre::War => "Military conflicts and their impact.",
            Genre::Western => "Stories of the American Old West.",
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Union of catalog ids for a set of genres, de-duplicated in first-seen order
pub fn catalog_ids_for(genres: &[Genre]) -> Vec<u32> {
    let mut ids = Vec::new();
    for id in genres.iter().flat_map(|genre| genre.catalog_ids()) {
        if !ids.contains(id) {
            ids.push(*id);
        }
    }
    ids
}

/// Display name for a catalog genre id, as shown to users
pub fn catalog_genre_name(id: u32) -> Option<&'static str> {
    use catalog_ids::*;
    let name = match id {
        ACTION => "Action",
        ADVENTURE => "Adventure",
        ANIMATION => "Animation",
        COMEDY => "Comedy",
        CRIME => "Crime",
        DOCUMENTARY => "Documentary",
        DRAMA => "Drama",
        FAMILY => "Family",
        FANTASY => "Fantasy",
        HISTORY => "History",
        HORROR => "Horror",
        MUSIC => "Music",
        MYSTERY => "Mystery",
        ROMANCE => "Romance",
        SCIENCE_FICTION => "Sci-Fi",
        TV_MOVIE => "TV Movie",
        THRILLER => "Thriller",
        WAR => "War",
        WESTERN => "Western",
        _ => return None,
    };
    Some(name)
}

/// Category label for a genre-id combination, e.g. `War/Drama`
pub fn category_name(ids: &[u32]) -> String {
    let names: Vec<&str> = ids
        .iter()
        .filter_map(|id| catalog_genre_name(*id))
        .collect();

    match names.as_slice() {
        [] => "General".to_string(),
        [only] => only.to_string(),
        [first, second] => format!("{}/{}", first, second),
        [first, second, ..] => format!("{}/{} & More", first, second),
    }
}
