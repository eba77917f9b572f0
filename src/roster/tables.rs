//! Built-in 2024-25 tables. A roster snapshot file replaces the roster table at startup.

const ROSTERS: &[(&str, &[&str])] = &[
    (
        "Boston Celtics",
        &[
            "Jayson Tatum", "Jaylen Brown", "Derrick White", "Jrue Holiday",
            "Kristaps Porzingis", "Al Horford", "Payton Pritchard", "Sam Hauser",
        ],
    ),
    (
        "Los Angeles Lakers",
        &[
            "LeBron James", "Anthony Davis", "Austin Reaves", "D'Angelo Russell",
            "Rui Hachimura", "Gabe Vincent", "Jarred Vanderbilt", "Max Christie",
        ],
    ),
    (
        "Golden State Warriors",
        &[
            "Stephen Curry", "Draymond Green", "Andrew Wiggins", "Klay Thompson",
            "Jonathan Kuminga", "Kevon Looney", "Chris Paul", "Brandin Podziemski",
        ],
    ),
    (
        "Denver Nuggets",
        &[
            "Nikola Jokic", "Jamal Murray", "Michael Porter Jr", "Aaron Gordon",
            "Kentavious Caldwell-Pope", "Reggie Jackson", "Christian Braun",
        ],
    ),
    (
        "Milwaukee Bucks",
        &[
            "Giannis Antetokounmpo", "Damian Lillard", "Khris Middleton",
            "Brook Lopez", "Bobby Portis", "Malik Beasley", "Pat Connaughton",
        ],
    ),
    (
        "Phoenix Suns",
        &[
            "Kevin Durant", "Devin Booker", "Bradley Beal", "Jusuf Nurkic",
            "Grayson Allen", "Eric Gordon", "Royce O'Neale",
        ],
    ),
    (
        "Philadelphia 76ers",
        &[
            "Joel Embiid", "Tyrese Maxey", "Paul George", "Kelly Oubre Jr",
            "Tobias Harris", "De'Anthony Melton", "Nicolas Batum",
        ],
    ),
    (
        "Miami Heat",
        &[
            "Jimmy Butler", "Bam Adebayo", "Tyler Herro", "Terry Rozier",
            "Jaime Jaquez Jr", "Duncan Robinson", "Caleb Martin",
        ],
    ),
    (
        "Dallas Mavericks",
        &[
            "Luka Doncic", "Kyrie Irving", "Daniel Gafford", "Dereck Lively II",
            "Tim Hardaway Jr", "Josh Green", "Maxi Kleber",
        ],
    ),
    (
        "New York Knicks",
        &[
            "Jalen Brunson", "Julius Randle", "OG Anunoby", "Donte DiVincenzo",
            "Josh Hart", "Mitchell Robinson", "Isaiah Hartenstein",
        ],
    ),
];

/// Head coaches, matched against video titles when a transcript carries no coach name.
pub const COACHES: &[&str] = &[
    "Quin Snyder",
    "Joe Mazzulla",
    "Jordi Fernández",
    "Charles Lee",
    "Billy Donovan",
    "Kenny Atkinson",
    "Jason Kidd",
    "Michael Malone",
    "J.B. Bickerstaff",
    "JB Bickerstaff",
    "Steve Kerr",
    "Ime Udoka",
    "Rick Carlisle",
    "Tyronn Lue",
    "JJ Redick",
    "Taylor Jenkins",
    "Erik Spoelstra",
    "Doc Rivers",
    "Chris Finch",
    "Willie Green",
    "Tom Thibodeau",
    "Mark Daigneault",
    "Jamahl Mosley",
    "Nick Nurse",
    "Mike Budenholzer",
    "Chauncey Billups",
    "Mike Brown",
    "Gregg Popovich",
    "Darko Rajaković",
    "Will Hardy",
    "Brian Keefe",
];

pub fn default_rosters() -> super::Rosters {
    ROSTERS
        .iter()
        .map(|(team, players)| {
            (
                team.to_string(),
                players.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect()
}
