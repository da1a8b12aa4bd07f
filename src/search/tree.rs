//! Arena-backed search tree.
//!
//! Nodes live in a single [`Vec`] and refer to each other by index. The parent
//! index is only used to walk statistics back up to the root.

use rand::Rng;

use crate::game::movegen::{filter_moves, generate_moves};
use crate::game::{Board, Move, Player};

pub(super) type NodeIndex = usize;
// This is a special value that is used to indicate that the node has no parent.
const TOMBSTONE_PARENT: NodeIndex = usize::MAX;
pub(super) const ROOT: NodeIndex = 0;

struct Node {
    parent: NodeIndex,
    /// Player to move in the position this node represents.
    player: Player,
    /// Move that led from the parent to this node, `None` for the root.
    last_move: Option<Move>,
    /// All legal moves of `player`. The first `expanded` ones already have
    /// child nodes.
    moves: Vec<Move>,
    expanded: usize,
    children: Vec<NodeIndex>,
    /// Total number of search iterations that went through this node.
    visits: u32,
    /// Number of simulations won by the player who made `last_move`.
    wins: u32,
}

impl Node {
    const fn new(
        parent: NodeIndex,
        player: Player,
        last_move: Option<Move>,
        moves: Vec<Move>,
    ) -> Self {
        Self {
            parent,
            player,
            last_move,
            moves,
            expanded: 0,
            children: Vec::new(),
            visits: 0,
            wins: 0,
        }
    }

    fn fully_expanded(&self) -> bool {
        self.expanded == self.moves.len()
    }
}

/// UCB1 score of a child: observed win rate plus an exploration term that
/// shrinks as the child gets visited.
///
/// Unvisited children are always tried first.
#[must_use]
pub(super) fn ucb1(wins: u32, visits: u32, parent_visits: u32, exploration: f32) -> f32 {
    if visits == 0 {
        return f32::INFINITY;
    }
    let visits = visits as f32;
    let win_rate = wins as f32 / visits;
    win_rate + exploration * ((parent_visits as f32).ln() / visits).sqrt()
}

/// Score used to pick the move that is finally played: Laplace-smoothed win
/// rate.
fn final_score(wins: u32, visits: u32) -> f32 {
    (wins as f32 + 1.0) / (visits as f32 + 2.0)
}

pub(super) struct Tree {
    nodes: Vec<Node>,
    exploration: f32,
}

impl Tree {
    /// Creates a tree with a single root node: `player` is to move and has
    /// `moves` available.
    pub(super) fn new(player: Player, moves: Vec<Move>, exploration: f32) -> Self {
        Self {
            nodes: vec![Node::new(TOMBSTONE_PARENT, player, None, moves)],
            exploration,
        }
    }

    /// Number of allocated nodes.
    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(super) fn player(&self, index: NodeIndex) -> Player {
        self.nodes[index].player
    }

    pub(super) fn visits(&self, index: NodeIndex) -> u32 {
        self.nodes[index].visits
    }

    #[cfg(test)]
    pub(super) fn wins(&self, index: NodeIndex) -> u32 {
        self.nodes[index].wins
    }

    /// Walks down from the root and returns the node a simulation should start
    /// from. `board` has to hold the root position and mirrors the returned
    /// node afterwards.
    ///
    /// While the current node has moves, it either gets a new child (if some
    /// moves were not tried yet) or the search descends into the child with the
    /// best [`ucb1`] score. A node without moves is terminal and returned as
    /// is.
    pub(super) fn select(&mut self, board: &mut Board, rng: &mut impl Rng) -> NodeIndex {
        let mut current = ROOT;
        while !self.nodes[current].moves.is_empty() {
            if !self.nodes[current].fully_expanded() {
                return self.expand(current, board, rng);
            }
            let child = self.best_child(current);
            if let Some(placement) = self.nodes[child].last_move {
                board.make_move(placement, self.nodes[current].player);
            }
            current = child;
        }
        current
    }

    /// Plays one untried move chosen uniformly at random and allocates the
    /// corresponding child.
    fn expand(&mut self, index: NodeIndex, board: &mut Board, rng: &mut impl Rng) -> NodeIndex {
        let node = &mut self.nodes[index];
        // Swap the chosen move into the tried prefix.
        let choice = rng.gen_range(node.expanded..node.moves.len());
        node.moves.swap(node.expanded, choice);
        let placement = node.moves[node.expanded];
        node.expanded += 1;
        let player = node.player;
        let grandparent = node.parent;

        board.make_move(placement, player);
        let moves = if grandparent == TOMBSTONE_PARENT {
            generate_moves(board, !player)
        } else {
            filter_moves(&self.nodes[grandparent].moves, board, !player)
        };

        let child = self.nodes.len();
        self.nodes.push(Node::new(index, !player, Some(placement), moves));
        self.nodes[index].children.push(child);
        child
    }

    /// Returns the child with the highest [`ucb1`] score, the first one on
    /// ties.
    fn best_child(&self, index: NodeIndex) -> NodeIndex {
        let node = &self.nodes[index];
        debug_assert!(!node.children.is_empty());
        let mut best = node.children[0];
        let mut best_score = f32::NEG_INFINITY;
        for &child in &node.children {
            let score = ucb1(
                self.nodes[child].wins,
                self.nodes[child].visits,
                node.visits,
                self.exploration,
            );
            if score > best_score {
                best = child;
                best_score = score;
            }
        }
        best
    }

    /// Records the simulation result on the path from `leaf` to the root.
    ///
    /// A node is credited with a win when the winner is not the player to move
    /// there, i.e. when the move leading into it was good for whoever made it.
    pub(super) fn backpropagate(&mut self, leaf: NodeIndex, winner: Player) {
        let mut current = leaf;
        while current != TOMBSTONE_PARENT {
            let node = &mut self.nodes[current];
            node.visits += 1;
            if winner != node.player {
                node.wins += 1;
            }
            current = node.parent;
        }
    }

    /// The visited root child with the best final score.
    fn best_root_child(&self) -> Option<NodeIndex> {
        self.nodes[ROOT]
            .children
            .iter()
            .copied()
            .filter(|&child| self.nodes[child].visits > 0)
            .max_by(|&lhs, &rhs| {
                let lhs = &self.nodes[lhs];
                let rhs = &self.nodes[rhs];
                final_score(lhs.wins, lhs.visits).total_cmp(&final_score(rhs.wins, rhs.visits))
            })
    }

    /// Picks the move to play. Falls back to any expanded child and then to
    /// the first legal move if the search did not get far enough to have
    /// statistics.
    pub(super) fn best_move(&self) -> Option<Move> {
        let root = &self.nodes[ROOT];
        self.best_root_child()
            .or_else(|| root.children.first().copied())
            .and_then(|child| self.nodes[child].last_move)
            .or_else(|| root.moves.first().copied())
    }

    /// Observed win rate of the move returned by [`Tree::best_move`], if it
    /// was simulated at least once.
    pub(super) fn best_win_rate(&self) -> Option<f32> {
        self.best_root_child()
            .map(|child| self.nodes[child].wins as f32 / self.nodes[child].visits as f32)
    }
}
