use std::cmp::Reverse;

#[derive(Debug, PartialEq, Eq)]
pub struct Teams<T> {
    pub home: Vec<T>,
    pub away: Vec<T>,
}

/// Splits players into two teams with a snake draft over their rank:
/// home, away, away, home, home, away, ...
///
/// Players of equal rank keep their relative order.
pub fn balance_teams<T, F>(mut players: Vec<T>, rank: F) -> Teams<T>
where
    F: Fn(&T) -> u8,
{
    players.sort_by_key(|player| Reverse(rank(player)));

    let mut teams = Teams {
        home: Vec::with_capacity(players.len() / 2 + 1),
        away: Vec::with_capacity(players.len() / 2 + 1),
    };

    for (pick, player) in players.into_iter().enumerate() {
        match pick % 4 {
            0 | 3 => teams.home.push(player),
            _ => teams.away.push(player),
        }
    }

    teams
}
