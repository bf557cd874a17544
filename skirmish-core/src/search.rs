//! Minimax search with alpha-beta pruning

use crate::config::EngineConfig;
use crate::error::SkirmishError;
use crate::eval::{Heuristics, Score};
use crate::node::SearchNode;
use crate::state::{CombatState, JointAction};
use crate::unit::Team;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Initial alpha (minus infinity)
pub const NEG_INF: Score = Score::MIN;
/// Initial beta (plus infinity)
pub const POS_INF: Score = Score::MAX;

// ============================================================================
// TYPES
// ============================================================================

/// Best direct child of a searched node, with its backed-up value.
///
/// When the searched node is a leaf, `node` is the node itself and `value`
/// its static utility.
#[derive(Clone, Debug)]
pub struct Scored {
    pub node: SearchNode,
    pub value: Score,
}

/// Counters from the most recent search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered, root included
    pub nodes: u64,
    /// Nodes scored statically (depth limit or no legal joint action)
    pub leaves: u64,
    /// Sibling loops cut short by `beta <= alpha`
    pub cutoffs: u64,
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Depth-limited minimax player, melee maximizing and ranged minimizing
pub struct AlphaBetaAI {
    pub depth: u32,
    pub heuristics: Heuristics,
    /// With pruning off the search is plain exhaustive minimax
    pub pruning: bool,
    stats: SearchStats,
}

impl AlphaBetaAI {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self {
            depth,
            heuristics,
            pruning: true,
            stats: SearchStats::default(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            depth: config.depth,
            heuristics: config.heuristics.clone(),
            pruning: config.pruning,
            stats: SearchStats::default(),
        }
    }

    /// Statistics of the last `best_action` / `search` call
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Choose the joint action for `side` in `state`.
    ///
    /// Returns `Ok(None)` when `side` has no legal joint action.
    pub fn best_action(
        &mut self,
        state: &CombatState,
        side: Team,
    ) -> Result<Option<JointAction>, SkirmishError> {
        if self.depth == 0 {
            return Err(SkirmishError::InvalidDepth(self.depth));
        }
        if state.team(side).is_empty() {
            return Err(SkirmishError::NoUnitsToMove(side));
        }

        self.stats = SearchStats::default();
        let root = SearchNode::root(state.clone());
        let best = self.search(root, self.depth, NEG_INF, POS_INF, side);

        tracing::debug!(
            "Search {:?} depth={} pruning={}: value={}, nodes={}, leaves={}, cutoffs={}",
            side,
            self.depth,
            self.pruning,
            best.value,
            self.stats.nodes,
            self.stats.leaves,
            self.stats.cutoffs
        );

        // A leaf root comes back as itself, carrying the empty root action
        if best.node.action.is_empty() {
            return Ok(None);
        }
        Ok(Some(best.node.action))
    }

    /// Search below `node` and return its best direct child.
    ///
    /// Depth-0 and childless nodes return themselves.
    pub fn search(
        &mut self,
        node: SearchNode,
        depth: u32,
        alpha: Score,
        beta: Score,
        side: Team,
    ) -> Scored {
        let Some(mut children) = self.expand(&node.state, depth, side) else {
            let value = self.leaf_value(&node.state);
            return Scored { node, value };
        };

        let (index, value) = self.select_child(&children, depth, alpha, beta, side);
        Scored {
            node: children.swap_remove(index),
            value,
        }
    }

    /// Evaluate a position statically
    pub fn evaluate(&self, state: &CombatState) -> Score {
        state.utility(&self.heuristics)
    }

    // ========================================================================
    // RECURSION
    // ========================================================================

    /// Backed-up value of `node`'s subtree
    fn subtree_value(
        &mut self,
        node: &SearchNode,
        depth: u32,
        alpha: Score,
        beta: Score,
        side: Team,
    ) -> Score {
        match self.expand(&node.state, depth, side) {
            Some(children) => self.select_child(&children, depth, alpha, beta, side).1,
            None => self.leaf_value(&node.state),
        }
    }

    /// Ordered children, or `None` for a leaf
    fn expand(&mut self, state: &CombatState, depth: u32, side: Team) -> Option<Vec<SearchNode>> {
        self.stats.nodes += 1;
        if depth == 0 {
            return None;
        }

        let mut children = state.children(side);
        if children.is_empty() {
            return None;
        }

        order_children(&mut children, &self.heuristics);
        Some(children)
    }

    fn leaf_value(&mut self, state: &CombatState) -> Score {
        self.stats.leaves += 1;
        state.utility(&self.heuristics)
    }

    /// Index and value of the best child for `side`.
    ///
    /// The first child seen with the best value wins ties.
    fn select_child(
        &mut self,
        children: &[SearchNode],
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        side: Team,
    ) -> (usize, Score) {
        let maximizing = side.is_maximizing();
        let mut best_index = 0;
        let mut best_value = if maximizing { NEG_INF } else { POS_INF };

        for (i, child) in children.iter().enumerate() {
            let value = self.subtree_value(child, depth - 1, alpha, beta, side.opponent());

            let improves = if maximizing { value > best_value } else { value < best_value };
            if i == 0 || improves {
                best_index = i;
                best_value = value;
            }

            if maximizing {
                alpha = alpha.max(best_value);
            } else {
                beta = beta.min(best_value);
            }

            if self.pruning && beta <= alpha {
                self.stats.cutoffs += 1;
                tracing::trace!(
                    "Cutoff at depth {} after {}/{} children (alpha={}, beta={})",
                    depth,
                    i + 1,
                    children.len(),
                    alpha,
                    beta
                );
                break;
            }
        }

        (best_index, best_value)
    }
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Sort children by static utility, ascending. Stable, so equal-valued
/// children keep generation order.
pub fn order_children(children: &mut [SearchNode], heuristics: &Heuristics) {
    children.sort_by_cached_key(|child| child.state.utility(heuristics));
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Battlefield, Cell, Direction};
    use crate::state::Action;
    use crate::unit::{Unit, UnitId};
    use std::sync::Arc;

    fn footman(id: UnitId, x: i32, y: i32) -> Unit {
        Unit::new(id, Team::Melee, Cell::new(x, y), 160, 1)
    }

    fn archer(id: UnitId, x: i32, y: i32) -> Unit {
        Unit::new(id, Team::Ranged, Cell::new(x, y), 50, 8)
    }

    fn state(width: i32, height: i32, obstacles: &[(i32, i32)], melee: Vec<Unit>, ranged: Vec<Unit>) -> CombatState {
        let field = Battlefield::new(width, height, obstacles.iter().map(|&(x, y)| Cell::new(x, y)));
        CombatState::new(Arc::new(field), melee, ranged)
    }

    fn skirmish_2v2() -> CombatState {
        state(
            6,
            6,
            &[(2, 2), (3, 2)],
            vec![footman(1, 0, 0), footman(2, 1, 0)],
            vec![archer(3, 4, 4), archer(4, 5, 5)],
        )
    }

    /// Plain minimax written independently of the engine
    fn reference_minimax(state: &CombatState, depth: u32, side: Team, h: &Heuristics) -> Score {
        let children = state.children(side);
        if depth == 0 || children.is_empty() {
            return state.utility(h);
        }
        let values = children
            .iter()
            .map(|c| reference_minimax(&c.state, depth - 1, side.opponent(), h));
        if side.is_maximizing() {
            values.max().unwrap()
        } else {
            values.min().unwrap()
        }
    }

    #[test]
    fn test_attack_when_adjacent() {
        // 2x1 map: the only legal footman action is the attack
        let game = state(2, 1, &[], vec![footman(1, 0, 0)], vec![archer(2, 1, 0)]);
        let mut ai = AlphaBetaAI::new(1, Heuristics::default());
        let action = ai.best_action(&game, Team::Melee).unwrap().unwrap();
        assert_eq!(action.len(), 1);
        assert_eq!(action[&1], Action::Attack { target: 2 });
    }

    #[test]
    fn test_attack_beats_moving() {
        let game = state(3, 3, &[], vec![footman(1, 0, 1)], vec![archer(2, 1, 1)]);
        let mut ai = AlphaBetaAI::new(1, Heuristics::default());
        let action = ai.best_action(&game, Team::Melee).unwrap().unwrap();
        assert_eq!(action[&1], Action::Attack { target: 2 });
    }

    #[test]
    fn test_approaches_archer() {
        let game = state(5, 1, &[], vec![footman(1, 0, 0)], vec![archer(2, 4, 0)]);
        let mut ai = AlphaBetaAI::new(1, Heuristics::default());
        let action = ai.best_action(&game, Team::Melee).unwrap().unwrap();
        assert_eq!(action[&1], Action::Move { direction: Direction::East });
    }

    #[test]
    fn test_archer_flees_at_depth_one() {
        // Archer minimizes: stepping away lengthens the footman's path
        let game = state(6, 1, &[], vec![footman(1, 0, 0)], vec![archer(2, 3, 0)]);
        let mut ai = AlphaBetaAI::new(1, Heuristics::default());
        let action = ai.best_action(&game, Team::Ranged).unwrap().unwrap();
        assert_eq!(action[&2], Action::Move { direction: Direction::East });
    }

    #[test]
    fn test_rejects_zero_depth() {
        let game = skirmish_2v2();
        let mut ai = AlphaBetaAI::new(0, Heuristics::default());
        assert_eq!(
            ai.best_action(&game, Team::Melee),
            Err(SkirmishError::InvalidDepth(0))
        );
    }

    #[test]
    fn test_rejects_empty_side() {
        let game = state(3, 1, &[], vec![], vec![archer(2, 2, 0)]);
        let mut ai = AlphaBetaAI::new(2, Heuristics::default());
        assert_eq!(
            ai.best_action(&game, Team::Melee),
            Err(SkirmishError::NoUnitsToMove(Team::Melee))
        );
    }

    #[test]
    fn test_terminal_node_returns_itself() {
        let game = state(3, 1, &[], vec![footman(1, 0, 0)], vec![]);
        assert!(game.children(Team::Melee).is_empty());

        let mut ai = AlphaBetaAI::new(4, Heuristics::default());
        let result = ai.search(SearchNode::root(game.clone()), 4, NEG_INF, POS_INF, Team::Melee);
        assert!(result.node.action.is_empty());
        assert_eq!(result.node.state.melee(), game.melee());
        assert_eq!(result.value, game.utility(&Heuristics::default()));
        assert_eq!(ai.stats().nodes, 1);
        assert_eq!(ai.best_action(&game, Team::Melee), Ok(None));
    }

    #[test]
    fn test_depth_zero_returns_node() {
        let game = skirmish_2v2();
        let mut ai = AlphaBetaAI::new(3, Heuristics::default());
        let result = ai.search(SearchNode::root(game.clone()), 0, NEG_INF, POS_INF, Team::Melee);
        assert!(result.node.action.is_empty());
        assert_eq!(result.value, game.utility(&ai.heuristics));
    }

    #[test]
    fn test_returns_direct_child() {
        let game = skirmish_2v2();
        let mut ai = AlphaBetaAI::new(3, Heuristics::default());
        let result = ai.search(SearchNode::root(game.clone()), 3, NEG_INF, POS_INF, Team::Melee);
        let expected = game.apply(Team::Melee, &result.node.action);
        assert_eq!(result.node.state.melee(), expected.melee());
        assert_eq!(result.node.state.ranged(), expected.ranged());
        assert!(game.legal_joint_actions(Team::Melee).contains(&result.node.action));
    }

    #[test]
    fn test_value_matches_reference_minimax() {
        let game = skirmish_2v2();
        let h = Heuristics::default();
        for depth in 1..=3 {
            let mut ai = AlphaBetaAI::new(depth, h.clone());
            let result = ai.search(SearchNode::root(game.clone()), depth, NEG_INF, POS_INF, Team::Melee);
            assert_eq!(result.value, reference_minimax(&game, depth, Team::Melee, &h), "depth {}", depth);
        }
    }

    #[test]
    fn test_pruning_keeps_choice() {
        let corridor = state(4, 1, &[], vec![footman(1, 0, 0)], vec![archer(2, 2, 0)]);
        for (game, depth) in [(corridor, 2), (skirmish_2v2(), 3)] {
            let mut pruned = AlphaBetaAI::new(depth, Heuristics::default());
            let mut full = AlphaBetaAI::new(depth, Heuristics::default());
            full.pruning = false;

            let a = pruned.best_action(&game, Team::Melee).unwrap();
            let b = full.best_action(&game, Team::Melee).unwrap();
            assert_eq!(a, b);
            assert!(pruned.stats().nodes <= full.stats().nodes);
            assert_eq!(full.stats().cutoffs, 0);
        }
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let game = skirmish_2v2();
        let mut pruned = AlphaBetaAI::new(3, Heuristics::default());
        let mut full = AlphaBetaAI::new(3, Heuristics::default());
        full.pruning = false;
        pruned.best_action(&game, Team::Melee).unwrap();
        full.best_action(&game, Team::Melee).unwrap();
        assert!(pruned.stats().cutoffs > 0);
        assert!(pruned.stats().nodes < full.stats().nodes);
    }

    #[test]
    fn test_deterministic() {
        let mut first = AlphaBetaAI::new(3, Heuristics::default());
        let mut second = AlphaBetaAI::new(3, Heuristics::default());
        let a = first.best_action(&skirmish_2v2(), Team::Melee).unwrap();
        let b = second.best_action(&skirmish_2v2(), Team::Melee).unwrap();
        assert_eq!(a, b);
        assert_eq!(first.stats(), second.stats());
    }

    #[test]
    fn test_first_of_equal_children_wins() {
        // Stepping east or south both leave the footman 3 steps away
        let game = state(3, 3, &[], vec![footman(1, 0, 0)], vec![archer(2, 2, 2)]);
        let mut children = game.children(Team::Melee);
        order_children(&mut children, &Heuristics::default());

        let mut ai = AlphaBetaAI::new(1, Heuristics::default());
        let chosen = ai.best_action(&game, Team::Melee).unwrap().unwrap();
        let best = children
            .iter()
            .map(|c| c.state.utility(&ai.heuristics))
            .max()
            .unwrap();
        let first_best = children
            .iter()
            .find(|c| c.state.utility(&ai.heuristics) == best)
            .unwrap();
        assert_eq!(chosen, first_best.action);
        assert_eq!(chosen[&1], Action::Move { direction: Direction::East });
    }

    #[test]
    fn test_order_children_ascending() {
        let game = skirmish_2v2();
        let h = Heuristics::default();
        let mut children = game.children(Team::Melee);
        order_children(&mut children, &h);
        let values: Vec<Score> = children.iter().map(|c| c.state.utility(&h)).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }
}
