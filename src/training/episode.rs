use crate::ai::TargetingAgent;
use crate::error::TrainingError;
use crate::game::Notification;
use crate::training::opponent::OpponentFleet;

/// Outcome of one simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameReport {
    pub shots: usize,
    pub ships_sunk: usize,
    pub won: bool,
}

/// Play a fresh game against `fleet`, stopping when every ship is sunk or
/// `max_shots` shots have been fired.
///
/// The outcome of the final shot is delivered through
/// [`TargetingAgent::observe`] so that its reward is recorded without the
/// agent selecting another cell.
pub fn play_game(
    agent: &mut TargetingAgent,
    fleet: &mut OpponentFleet,
    max_shots: usize,
) -> Result<GameReport, TrainingError> {
    agent.new_game();
    let mut notification = Notification::RequestShot;
    let mut shots = 0;

    while !fleet.is_defeated() && shots < max_shots {
        let coord = agent.next_move(notification)?;
        shots += 1;
        notification = fleet.fire(coord).notification();
    }
    agent.observe(notification)?;

    Ok(GameReport {
        shots,
        ships_sunk: fleet.ships_sunk(),
        won: fleet.is_defeated(),
    })
}
