/// Hand-curated recommendations used when the live catalog cannot be reached
///
/// Lists are chosen from genre averages alone, so the same scores always give
/// the same result. Any genre averaging at least 3 is guaranteed to produce
/// at least one list.
use crate::models::{catalog_genre_name, catalog_ids, Genre, GenreScores, Movie, RecommendationMap};
use crate::services::planner::{CRIME_DRAMA_THRESHOLD, GENRE_THRESHOLD, MAX_SINGLE_GENRES};

/// Label for genres the catalog has no vocabulary for
pub const GENERAL_CATEGORY: &str = "General";

struct FallbackMovie {
    title: &'static str,
    year: i32,
    rating: f64,
    metascore: u8,
    description: &'static str,
}

impl FallbackMovie {
    fn to_movie(&self) -> Movie {
        Movie {
            title: self.title.to_string(),
            year: self.year,
            rating_value: self.rating,
            description: self.description.to_string(),
            poster_url: None,
            external_id: None,
            runtime_minutes: None,
            genres: None,
            vote_count: None,
            popularity: None,
            imdb_id: None,
            metascore: Some(self.metascore),
        }
    }
}

const fn pick(
    title: &'static str,
    year: i32,
    rating: f64,
    metascore: u8,
    description: &'static str,
) -> FallbackMovie {
    FallbackMovie {
        title,
        year,
        rating,
        metascore,
        description,
    }
}

/// A curated list shown when `applies` holds for the group's scores
struct CombinationList {
    category: &'static str,
    /// Genres this list already speaks for; they get no single-genre list
    covers: &'static [Genre],
    applies: fn(&GenreScores) -> bool,
    movies: &'static [FallbackMovie],
}

fn war_drama(scores: &GenreScores) -> bool {
    scores.average(Genre::War) >= GENRE_THRESHOLD && scores.average(Genre::Drama) >= GENRE_THRESHOLD
}

fn historical_war_drama(scores: &GenreScores) -> bool {
    scores.average(Genre::History) >= GENRE_THRESHOLD
        && (scores.average(Genre::War) >= GENRE_THRESHOLD
            || scores.average(Genre::Drama) >= GENRE_THRESHOLD)
}

fn crime_drama(scores: &GenreScores) -> bool {
    scores.average(Genre::Crime) >= CRIME_DRAMA_THRESHOLD
        && scores.average(Genre::Drama) >= CRIME_DRAMA_THRESHOLD
}

static COMBINATION_LISTS: &[CombinationList] = &[
    CombinationList {
        category: "War/Drama",
        covers: &[Genre::War, Genre::Drama],
        applies: war_drama,
        movies: &[
            pick(
                "Saving Private Ryan",
                1998,
                8.6,
                91,
                "Following D-Day, soldiers search for a paratrooper whose brothers have been killed.",
            ),
            pick(
                "1917",
                2019,
                8.2,
                78,
                "Two soldiers race against time to deliver a message that will stop a deadly attack.",
            ),
            pick(
                "Dunkirk",
                2017,
                7.8,
                94,
                "Allied soldiers are evacuated from beaches during WWII as German forces close in.",
            ),
            pick(
                "The Thin Red Line",
                1998,
                7.6,
                78,
                "The battle of Guadalcanal seen through the eyes of several soldiers.",
            ),
            pick(
                "Apocalypse Now",
                1979,
                8.4,
                94,
                "A captain travels into Cambodia to assassinate a renegade colonel during the Vietnam War.",
            ),
            pick(
                "Full Metal Jacket",
                1987,
                8.3,
                76,
                "A pragmatic Marine observes the dehumanizing effects of the Vietnam War on fellow recruits.",
            ),
            pick(
                "Platoon",
                1986,
                8.1,
                86,
                "A young soldier in Vietnam faces a moral crisis when confronted with the horrors of war.",
            ),
            pick(
                "The Deer Hunter",
                1978,
                8.1,
                86,
                "An in-depth examination of how the Vietnam War impacts the lives of people in a small town.",
            ),
            pick(
                "Black Hawk Down",
                2001,
                7.7,
                75,
                "The story of a U.S. military raid in Somalia that went disastrously wrong.",
            ),
            pick(
                "Hacksaw Ridge",
                2016,
                8.1,
                71,
                "A WWII medic serves on the battlefield without a weapon, saving 75 men.",
            ),
        ],
    },
    CombinationList {
        category: "Historical War/Drama",
        covers: &[Genre::History, Genre::War, Genre::Drama],
        applies: historical_war_drama,
        movies: &[
            pick(
                "Schindler's List",
                1993,
                9.0,
                95,
                "A German businessman saves over a thousand Polish-Jewish refugees during the Holocaust.",
            ),
            pick(
                "The Pianist",
                2002,
                8.5,
                85,
                "A Polish Jewish musician struggles to survive the destruction of the Warsaw ghetto.",
            ),
            pick(
                "Glory",
                1989,
                7.8,
                78,
                "The story of the first all-African-American regiment in the Civil War.",
            ),
            pick(
                "Lawrence of Arabia",
                1962,
                8.3,
                100,
                "The story of T.E. Lawrence and his experiences in the Arabian Peninsula during WWI.",
            ),
            pick(
                "Paths of Glory",
                1957,
                8.4,
                90,
                "A colonel defends three scapegoats on trial for cowardice during WWI.",
            ),
            pick(
                "All Quiet on the Western Front",
                2022,
                7.8,
                76,
                "A young German soldier's terrifying experiences on the Western Front during WWI.",
            ),
            pick(
                "The Bridge on the River Kwai",
                1957,
                8.1,
                87,
                "British POWs are forced to build a bridge for their Japanese captors in WWII.",
            ),
            pick(
                "Enemy at the Gates",
                2001,
                7.6,
                53,
                "A Russian and a German sniper play a game of cat-and-mouse during the Battle of Stalingrad.",
            ),
            pick(
                "Letters from Iwo Jima",
                2006,
                7.8,
                89,
                "The Battle of Iwo Jima seen from the perspective of the Japanese.",
            ),
            pick(
                "Master and Commander",
                2003,
                7.5,
                81,
                "During the Napoleonic Wars, a British frigate pursues a French warship.",
            ),
        ],
    },
    CombinationList {
        category: "Crime/Drama/Mystery",
        covers: &[Genre::Crime, Genre::Drama],
        applies: crime_drama,
        movies: &[
            pick(
                "The Godfather",
                1972,
                9.2,
                100,
                "The aging patriarch of a crime dynasty transfers control to his son.",
            ),
            pick(
                "The Departed",
                2006,
                8.5,
                85,
                "An undercover cop and a mole in the police try to identify each other.",
            ),
            pick(
                "Heat",
                1995,
                8.3,
                76,
                "A group of professional bank robbers face off against a dedicated detective.",
            ),
            pick(
                "Casino",
                1995,
                8.2,
                73,
                "A tale of greed and deception in Las Vegas casinos.",
            ),
            pick(
                "Scarface",
                1983,
                8.3,
                65,
                "A Cuban immigrant rises to power in Miami's drug underworld.",
            ),
        ],
    },
];

/// Short per-catalog-genre lists, keyed by catalog genre id
static GENRE_PICKS: &[(u32, &[FallbackMovie])] = &[
    (
        catalog_ids::ACTION,
        &[
            pick(
                "Mad Max: Fury Road",
                2015,
                8.1,
                90,
                "A drifter and a rebel warrior flee a tyrant across a desert wasteland.",
            ),
            pick(
                "The Dark Knight",
                2008,
                9.0,
                84,
                "Batman faces the Joker, a criminal mastermind who plunges Gotham into chaos.",
            ),
            pick(
                "Die Hard",
                1988,
                8.2,
                72,
                "An off-duty cop takes on terrorists who seize a Los Angeles skyscraper.",
            ),
        ],
    ),
    (
        catalog_ids::ADVENTURE,
        &[
            pick(
                "Raiders of the Lost Ark",
                1981,
                8.4,
                92,
                "An archaeologist races the Nazis to find the Ark of the Covenant.",
            ),
            pick(
                "The Lord of the Rings: The Fellowship of the Ring",
                2001,
                8.9,
                92,
                "A hobbit sets out to destroy a ring of terrible power.",
            ),
            pick(
                "Jurassic Park",
                1993,
                8.2,
                68,
                "Cloned dinosaurs break loose in an island theme park.",
            ),
        ],
    ),
    (
        catalog_ids::ANIMATION,
        &[
            pick(
                "Spirited Away",
                2001,
                8.6,
                96,
                "A girl wanders into a world of spirits and must free her parents.",
            ),
            pick(
                "Toy Story",
                1995,
                8.3,
                95,
                "A cowboy doll feels threatened when a space ranger toy arrives.",
            ),
            pick(
                "Spider-Man: Into the Spider-Verse",
                2018,
                8.4,
                87,
                "A Brooklyn teen becomes one of many Spider-People across dimensions.",
            ),
        ],
    ),
    (
        catalog_ids::COMEDY,
        &[
            pick(
                "Groundhog Day",
                1993,
                8.0,
                72,
                "A cynical weatherman relives the same day over and over.",
            ),
            pick(
                "Some Like It Hot",
                1959,
                8.2,
                98,
                "Two musicians disguise themselves as women to escape the mob.",
            ),
            pick(
                "The Grand Budapest Hotel",
                2014,
                8.1,
                88,
                "A legendary concierge is framed for murder at a famous European hotel.",
            ),
        ],
    ),
    (
        catalog_ids::CRIME,
        &[
            pick(
                "Pulp Fiction",
                1994,
                8.9,
                95,
                "Intertwining tales of mobsters, boxers and small-time thieves in Los Angeles.",
            ),
            pick(
                "Goodfellas",
                1990,
                8.7,
                92,
                "The rise and fall of a mob associate over three decades.",
            ),
            pick(
                "Fargo",
                1996,
                8.1,
                85,
                "A desperate car salesman's kidnapping scheme spirals out of control.",
            ),
        ],
    ),
    (
        catalog_ids::DOCUMENTARY,
        &[
            pick(
                "Free Solo",
                2018,
                8.1,
                83,
                "A climber attempts to scale El Capitan without ropes.",
            ),
            pick(
                "Man on Wire",
                2008,
                7.7,
                89,
                "The story of a high-wire walk between the Twin Towers in 1974.",
            ),
            pick(
                "Won't You Be My Neighbor?",
                2018,
                8.3,
                90,
                "A portrait of children's television host Fred Rogers.",
            ),
        ],
    ),
    (
        catalog_ids::DRAMA,
        &[
            pick(
                "The Shawshank Redemption",
                1994,
                9.3,
                82,
                "Two imprisoned men bond over years, finding solace and redemption.",
            ),
            pick(
                "12 Angry Men",
                1957,
                9.0,
                97,
                "A juror urges his colleagues to reconsider a seemingly obvious verdict.",
            ),
            pick(
                "Parasite",
                2019,
                8.5,
                96,
                "A poor family schemes its way into the household of a wealthy one.",
            ),
        ],
    ),
    (
        catalog_ids::FAMILY,
        &[
            pick(
                "Paddington 2",
                2017,
                7.8,
                88,
                "A polite bear is framed for stealing a rare pop-up book.",
            ),
            pick(
                "E.T. the Extra-Terrestrial",
                1982,
                7.9,
                92,
                "A boy befriends a stranded alien and helps him get home.",
            ),
            pick(
                "The Iron Giant",
                1999,
                8.1,
                85,
                "A boy befriends a giant robot the government wants destroyed.",
            ),
        ],
    ),
    (
        catalog_ids::FANTASY,
        &[
            pick(
                "Pan's Labyrinth",
                2006,
                8.2,
                98,
                "A girl in Francoist Spain escapes into an eerie fantasy world.",
            ),
            pick(
                "The Princess Bride",
                1987,
                8.0,
                77,
                "A farmhand turned pirate sets out to rescue his true love.",
            ),
            pick(
                "Big Fish",
                2003,
                8.0,
                58,
                "A son untangles the tall tales of his dying father.",
            ),
        ],
    ),
    (
        catalog_ids::HISTORY,
        &[
            pick(
                "Lincoln",
                2012,
                7.3,
                87,
                "The president fights to pass the Thirteenth Amendment.",
            ),
            pick(
                "12 Years a Slave",
                2013,
                8.1,
                96,
                "A free man is kidnapped and sold into slavery in the antebellum South.",
            ),
            pick(
                "Amadeus",
                1984,
                8.4,
                88,
                "A rival composer recounts his envy of Mozart.",
            ),
        ],
    ),
    (
        catalog_ids::HORROR,
        &[
            pick(
                "The Shining",
                1980,
                8.4,
                68,
                "A writer caretaking an isolated hotel descends into madness.",
            ),
            pick(
                "Alien",
                1979,
                8.5,
                89,
                "A spaceship crew is hunted by a deadly creature.",
            ),
            pick(
                "Get Out",
                2017,
                7.8,
                85,
                "A young man uncovers a disturbing secret at his girlfriend's family estate.",
            ),
        ],
    ),
    (
        catalog_ids::MUSIC,
        &[
            pick(
                "Whiplash",
                2014,
                8.5,
                89,
                "A young drummer is pushed to the edge by a ruthless instructor.",
            ),
            pick(
                "Singin' in the Rain",
                1952,
                8.3,
                99,
                "Silent film stars struggle with the arrival of talking pictures.",
            ),
            pick(
                "Walk the Line",
                2005,
                7.8,
                72,
                "The rise of Johnny Cash and his romance with June Carter.",
            ),
        ],
    ),
    (
        catalog_ids::MYSTERY,
        &[
            pick(
                "Rear Window",
                1954,
                8.5,
                100,
                "A laid-up photographer suspects a neighbor of murder.",
            ),
            pick(
                "Memento",
                2000,
                8.4,
                83,
                "A man with short-term memory loss hunts his wife's killer.",
            ),
            pick(
                "Knives Out",
                2019,
                7.9,
                82,
                "A detective investigates the death of a wealthy crime novelist.",
            ),
        ],
    ),
    (
        catalog_ids::ROMANCE,
        &[
            pick(
                "Casablanca",
                1942,
                8.5,
                100,
                "A nightclub owner must choose between love and virtue in wartime Morocco.",
            ),
            pick(
                "Before Sunrise",
                1995,
                8.1,
                77,
                "Two strangers spend one night walking and talking in Vienna.",
            ),
            pick(
                "Eternal Sunshine of the Spotless Mind",
                2004,
                8.3,
                89,
                "A couple undergoes a procedure to erase each other from memory.",
            ),
        ],
    ),
    (
        catalog_ids::SCIENCE_FICTION,
        &[
            pick(
                "Blade Runner",
                1982,
                8.1,
                84,
                "A detective hunts rogue replicants in a dystopian Los Angeles.",
            ),
            pick(
                "Arrival",
                2016,
                7.9,
                81,
                "A linguist works to communicate with mysterious alien visitors.",
            ),
            pick(
                "The Matrix",
                1999,
                8.7,
                73,
                "A hacker learns that reality is a simulation run by machines.",
            ),
        ],
    ),
    (
        catalog_ids::THRILLER,
        &[
            pick(
                "Se7en",
                1995,
                8.6,
                65,
                "Two detectives hunt a serial killer who models his crimes on the seven deadly sins.",
            ),
            pick(
                "The Silence of the Lambs",
                1991,
                8.6,
                86,
                "An FBI trainee seeks a cannibal's help to catch another killer.",
            ),
            pick(
                "North by Northwest",
                1959,
                8.3,
                98,
                "An advertising man is mistaken for a spy and pursued across the country.",
            ),
        ],
    ),
    (
        catalog_ids::WAR,
        &[
            pick(
                "Das Boot",
                1981,
                8.4,
                86,
                "The crew of a German U-boat endures a harrowing WWII patrol.",
            ),
            pick(
                "The Great Escape",
                1963,
                8.2,
                86,
                "Allied prisoners plan a mass breakout from a German POW camp.",
            ),
            pick(
                "Hacksaw Ridge",
                2016,
                8.1,
                71,
                "A WWII medic serves on the battlefield without a weapon, saving 75 men.",
            ),
        ],
    ),
    (
        catalog_ids::WESTERN,
        &[
            pick(
                "The Good, the Bad and the Ugly",
                1966,
                8.8,
                90,
                "Three gunslingers compete to find a buried cache of Confederate gold.",
            ),
            pick(
                "Unforgiven",
                1992,
                8.2,
                85,
                "A retired gunslinger takes on one last job.",
            ),
            pick(
                "True Grit",
                2010,
                7.6,
                80,
                "A girl hires a tough marshal to track down her father's killer.",
            ),
        ],
    ),
];

/// For genres with no catalog vocabulary
static GENERAL_PICKS: &[FallbackMovie] = &[
    pick(
        "Citizen Kane",
        1941,
        8.3,
        100,
        "A reporter pieces together the life of a newspaper tycoon.",
    ),
    pick(
        "Seven Samurai",
        1954,
        8.6,
        98,
        "A village hires seven samurai to defend it from bandits.",
    ),
    pick(
        "Vertigo",
        1958,
        8.3,
        100,
        "A retired detective becomes obsessed with a mysterious woman.",
    ),
];

fn picks_for(genre: Genre) -> (&'static str, &'static [FallbackMovie]) {
    genre
        .catalog_ids()
        .first()
        .and_then(|id| {
            let name = catalog_genre_name(*id)?;
            let (_, movies) = GENRE_PICKS.iter().find(|(pick_id, _)| pick_id == id)?;
            Some((name, *movies))
        })
        .unwrap_or((GENERAL_CATEGORY, GENERAL_PICKS))
}

/// Static recommendations for the given scores
///
/// Combination lists come first in table order, followed by single-genre
/// lists for the strongest genres no combination list already covers.
pub fn fallback_recommendations(scores: &GenreScores) -> RecommendationMap {
    let mut recommendations = RecommendationMap::new();
    let mut covered: Vec<Genre> = Vec::new();

    let applicable = COMBINATION_LISTS.iter().filter(|l| (l.applies)(scores));
    for list in applicable {
        recommendations.insert(
            list.category.to_string(),
            list.movies.iter().map(FallbackMovie::to_movie).collect(),
        );
        covered.extend_from_slice(list.covers);
    }

    let strongest = scores
        .ranked()
        .into_iter()
        .filter(|(_, score)| score.average >= GENRE_THRESHOLD)
        .take(MAX_SINGLE_GENRES)
        .map(|(genre, _)| genre);

    for genre in strongest {
        if covered.contains(&genre) {
            continue;
        }
        let (category, movies) = picks_for(genre);
        if recommendations.get(category).is_none() {
            recommendations.insert(
                category.to_string(),
                movies.iter().map(FallbackMovie::to_movie).collect(),
            );
        }
    }

    tracing::debug!(
        categories = recommendations.len(),
        "Built fallback recommendations"
    );

    recommendations
}
