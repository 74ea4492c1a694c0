//! The Wondev game bound to the generic referee.

use log::{debug, error, info};

use crate::config::MatchSettings;
use crate::error::EliminationCause;
use crate::game::{
    check_action_result, check_invariants, generate_map, match_rng, GameState, MapGenError,
    PlayerId, Ruleset, UnitRef,
};
use crate::protocol::{self, parse_command, Command};
use crate::referee::{
    Defeat, MatchConfig, MatchResult, MatchRunner, PlayerAgent, RefereeError, TurnBasedGame,
};

/// Seats in a Wondev match.
pub const PLAYER_COUNT: usize = 2;

/// Error type for setting up and running a match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Map generation failed.
    #[error("Map generation failed: {0}")]
    MapGen(#[from] MapGenError),
    /// The referee rejected the setup.
    #[error(transparent)]
    Referee(#[from] RefereeError),
}

/// A match in progress: game state plus the settings that produced it.
#[derive(Debug, Clone)]
pub struct GameSession {
    state: GameState,
    settings: MatchSettings,
}

impl GameSession {
    /// Generate the map and spawn units for a new match.
    ///
    /// # Errors
    ///
    /// Returns an error if units cannot be placed on the chosen map.
    pub fn new(settings: MatchSettings, ruleset: Ruleset) -> Result<Self, MapGenError> {
        let mut rng = match_rng(settings.seed);
        let map = generate_map(
            &mut rng,
            settings.map_index,
            settings.symmetric,
            &ruleset,
            PLAYER_COUNT,
        )?;
        let settings = MatchSettings {
            map_index: i32::try_from(map.map_index).unwrap_or(-1),
            ..settings
        };
        info!(
            "seed {} map {} (rules v{}, symmetric {})",
            settings.seed, settings.map_index, ruleset.version, settings.symmetric
        );
        Ok(Self {
            state: GameState::new(map.board, map.players, ruleset),
            settings,
        })
    }

    /// Wrap an existing state.
    #[must_use]
    pub fn from_state(state: GameState, settings: MatchSettings) -> Self {
        Self { state, settings }
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Settings with the map index actually used, for echoing back.
    #[must_use]
    pub fn settings(&self) -> MatchSettings {
        self.settings
    }

    fn eliminate(&mut self, player: PlayerId, cause: EliminationCause) -> Defeat {
        self.state.last_player = player;
        if let Some(p) = self.state.players.get_mut(player) {
            p.die();
        }
        debug!("player {player} eliminated: {}", cause.reason());
        Defeat::from(cause)
    }

    fn report_invariants(&self) {
        for violation in check_invariants(&self.state) {
            error!("{violation}");
        }
    }
}

impl TurnBasedGame for GameSession {
    fn player_count(&self) -> usize {
        self.state.players.len()
    }

    fn max_rounds(&self) -> u32 {
        self.state.ruleset.max_rounds
    }

    fn prepare_round(&mut self, _round: u32) {
        self.state.reset_round();
    }

    fn init_input(&self, _player: PlayerId) -> Vec<String> {
        protocol::init_input(&self.state)
    }

    fn turn_input(&self, player: PlayerId) -> Vec<String> {
        protocol::turn_input(&self.state, player)
    }

    fn apply_output(&mut self, player: PlayerId, line: &str) -> Result<(), Defeat> {
        let invalid = |state: &GameState| EliminationCause::InvalidInput {
            expected: state.ruleset.expected_command(),
            found: line.to_string(),
        };

        let (action, message) = match parse_command(line) {
            Ok(Command::Act { action, message }) => (action, message),
            Ok(Command::AcceptDefeat { message }) => {
                if let Some(p) = self.state.players.get_mut(player) {
                    p.set_message(message.as_deref());
                }
                return Err(self.eliminate(player, EliminationCause::AcceptedDefeat { player }));
            }
            Err(e) => {
                debug!("player {player} sent unparseable {line:?}: {e}");
                let cause = invalid(&self.state);
                return Err(self.eliminate(player, cause));
            }
        };

        let actor = UnitRef::new(player, action.unit);
        let Some(unit) = self.state.unit(actor).cloned() else {
            let cause = invalid(&self.state);
            return Err(self.eliminate(player, cause));
        };

        let result = match self.state.resolve(&unit, &action) {
            Ok(result) => result,
            Err(failure) => return Err(self.eliminate(player, failure.into())),
        };
        for violation in check_action_result(&result) {
            error!("{violation}");
        }

        self.state.apply(actor, result);
        if let Some(p) = self.state.players.get_mut(player) {
            p.set_message(message.as_deref());
        }
        debug!("player {player} played {action}");
        self.report_invariants();
        Ok(())
    }

    fn timeout(&mut self, player: PlayerId) -> Defeat {
        self.eliminate(player, EliminationCause::Timeout { player })
    }

    fn is_over(&self) -> bool {
        let players = &self.state.players;
        if self.state.ruleset.win_on_max_height {
            players.iter().any(|p| p.won || p.dead)
        } else {
            players.iter().all(|p| p.dead)
        }
    }

    fn score(&self, player: PlayerId) -> i64 {
        self.state.ranking_score(player)
    }

    fn view_init(&self) -> Vec<String> {
        protocol::view_init(&self.state)
    }

    fn view_frame(&self) -> Vec<String> {
        protocol::view_frame(&self.state)
    }

    fn summary(&self) -> Vec<String> {
        protocol::summary_lines(&self.state)
    }
}

/// Set up and play a complete match.
///
/// # Errors
///
/// Returns an error if the map cannot be generated or the agents do not
/// match the seats.
pub fn run_match<'a>(
    settings: MatchSettings,
    ruleset: Ruleset,
    agents: Vec<Box<dyn PlayerAgent + 'a>>,
    config: MatchConfig,
) -> Result<(MatchResult, GameSession), SessionError> {
    let session = GameSession::new(settings, ruleset)?;
    let runner = MatchRunner::new(session, agents, config)?;
    Ok(runner.run())
}
