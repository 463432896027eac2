//! Arena of label nodes for one direction of one day.
//!
//! Every node sits in at most one rank list: the active list or the settled
//! list of its customer. Lists are ordered by ascending reduced cost; a new
//! node goes in front of nodes with the same cost. Nodes also form a
//! generation tree (parent, first child, sibling links) so that deleting a
//! settled label can take all of its extensions with it.
//!
//! Nodes are never freed individually; the whole arena is dropped when the
//! day's run ends.

use super::label::{Direction, ResourceLabel};

/// Handle of a node in a [`LabelPool`].
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(u32);

impl LabelId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl std::fmt::Display for LabelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LabelId({})", self.0)
    }
}

/// Lifecycle state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Waiting in the active list of its customer.
    Active,
    /// Popped by the engine and being extended.
    Processing,
    /// Fully extended; kept for dominance and concatenation.
    Settled,
    /// Removed by dominance.
    Deleted,
}

#[derive(Debug, Clone)]
struct LabelNode {
    label: ResourceLabel,
    state: NodeState,
    prev: Option<LabelId>,
    next: Option<LabelId>,
    parent: Option<LabelId>,
    first_child: Option<LabelId>,
    prev_sibling: Option<LabelId>,
    next_sibling: Option<LabelId>,
}

#[derive(Debug, Clone, Copy, Default)]
struct RankList {
    head: Option<LabelId>,
    tail: Option<LabelId>,
    len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Universe {
    Active,
    Settled,
}

/// Label arena with per-customer active and settled rank lists.
///
/// # Examples
///
/// ```
/// use u_pricing::labeling::{Direction, LabelPool, NodeState, ResourceLabel};
///
/// let mut pool = LabelPool::new(Direction::Forward, 3);
/// let root = pool.insert(ResourceLabel::depot(Direction::Forward, 0.0, 0.0, 0), None);
/// assert_eq!(pool.active_len(0), 1);
///
/// let popped = pool.pop_active(0).unwrap();
/// assert_eq!(popped, root);
/// assert_eq!(pool.state(root), NodeState::Processing);
/// pool.settle(root);
/// assert_eq!(pool.settled(0).collect::<Vec<_>>(), vec![root]);
/// ```
#[derive(Debug, Clone)]
pub struct LabelPool {
    direction: Direction,
    nodes: Vec<LabelNode>,
    active: Vec<RankList>,
    settled: Vec<RankList>,
}

impl LabelPool {
    /// Creates an empty pool for `locations` customers (depot included).
    pub fn new(direction: Direction, locations: usize) -> Self {
        Self {
            direction,
            nodes: Vec::new(),
            active: vec![RankList::default(); locations],
            settled: vec![RankList::default(); locations],
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of nodes ever created, deleted ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn label(&self, id: LabelId) -> &ResourceLabel {
        &self.nodes[id.index()].label
    }

    pub fn state(&self, id: LabelId) -> NodeState {
        self.nodes[id.index()].state
    }

    pub fn parent(&self, id: LabelId) -> Option<LabelId> {
        self.nodes[id.index()].parent
    }

    /// Children of `id`, most recent first.
    pub fn children(&self, id: LabelId) -> Siblings<'_> {
        Siblings {
            pool: self,
            next: self.nodes[id.index()].first_child,
        }
    }

    /// Head of the active list of `customer`.
    pub fn first_active(&self, customer: usize) -> Option<LabelId> {
        self.active[customer].head
    }

    pub fn active_len(&self, customer: usize) -> usize {
        self.active[customer].len
    }

    pub fn settled_len(&self, customer: usize) -> usize {
        self.settled[customer].len
    }

    /// Active nodes of `customer` by ascending reduced cost.
    pub fn active(&self, customer: usize) -> Ranked<'_> {
        Ranked {
            pool: self,
            next: self.active[customer].head,
        }
    }

    /// Settled nodes of `customer` by ascending reduced cost.
    pub fn settled(&self, customer: usize) -> Ranked<'_> {
        Ranked {
            pool: self,
            next: self.settled[customer].head,
        }
    }

    /// Adds `label` to the active list of its customer and links it under
    /// `parent`.
    pub fn insert(&mut self, label: ResourceLabel, parent: Option<LabelId>) -> LabelId {
        let id = LabelId::from_index(self.nodes.len());
        let customer = label.customer();
        self.nodes.push(LabelNode {
            label,
            state: NodeState::Active,
            prev: None,
            next: None,
            parent,
            first_child: None,
            prev_sibling: None,
            next_sibling: None,
        });
        self.link_ranked(Universe::Active, customer, id);
        if let Some(p) = parent {
            let old_first = self.nodes[p.index()].first_child;
            self.nodes[id.index()].next_sibling = old_first;
            if let Some(f) = old_first {
                self.nodes[f.index()].prev_sibling = Some(id);
            }
            self.nodes[p.index()].first_child = Some(id);
        }
        id
    }

    /// Removes the cheapest active node of `customer` and marks it
    /// [`NodeState::Processing`].
    pub fn pop_active(&mut self, customer: usize) -> Option<LabelId> {
        let id = self.active[customer].head?;
        self.unlink_ranked(Universe::Active, customer, id);
        self.nodes[id.index()].state = NodeState::Processing;
        Some(id)
    }

    /// Moves a processing node into the settled list of its customer.
    pub fn settle(&mut self, id: LabelId) {
        debug_assert_eq!(self.state(id), NodeState::Processing);
        let customer = self.label(id).customer();
        self.nodes[id.index()].state = NodeState::Settled;
        self.link_ranked(Universe::Settled, customer, id);
    }

    /// Deletes an active node that was never extended.
    pub fn remove_active(&mut self, id: LabelId) {
        debug_assert_eq!(self.state(id), NodeState::Active);
        let customer = self.label(id).customer();
        self.unlink_ranked(Universe::Active, customer, id);
        self.detach_from_parent(id);
        self.nodes[id.index()].state = NodeState::Deleted;
    }

    /// Deletes `id` together with every descendant and returns the number of
    /// nodes deleted.
    ///
    /// Settled and active descendants leave their lists; a processing
    /// descendant is only marked deleted so the engine stops extending it.
    pub fn delete_subtree(&mut self, id: LabelId) -> usize {
        if self.state(id) == NodeState::Deleted {
            return 0;
        }
        self.detach_from_parent(id);
        let mut deleted = 0;
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            let mut child = self.nodes[node.index()].first_child;
            while let Some(c) = child {
                stack.push(c);
                child = self.nodes[c.index()].next_sibling;
            }
            let customer = self.label(node).customer();
            match self.state(node) {
                NodeState::Active => self.unlink_ranked(Universe::Active, customer, node),
                NodeState::Settled => self.unlink_ranked(Universe::Settled, customer, node),
                NodeState::Processing => {}
                NodeState::Deleted => continue,
            }
            self.nodes[node.index()].state = NodeState::Deleted;
            deleted += 1;
        }
        deleted
    }

    /// Returns `true` if `ancestor` lies on the parent chain of `id` (or is
    /// `id` itself).
    pub fn is_ancestor(&self, ancestor: LabelId, id: LabelId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// Customers on the path from `id` up to the generation root, depot
    /// excluded, starting with the customer of `id`.
    pub fn path_customers(&self, id: LabelId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            let customer = self.label(c).customer();
            if customer != 0 {
                path.push(customer);
            }
            cur = self.parent(c);
        }
        path
    }

    /// Verifies the list and tree structure.
    ///
    /// Checks that list lengths match their linked nodes, lists are sorted
    /// and hold nodes of the right state and customer, child links point
    /// back to their parent, parent chains are acyclic and no live node
    /// hangs below a deleted one.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (universe, lists, expected) in [
            (Universe::Active, &self.active, NodeState::Active),
            (Universe::Settled, &self.settled, NodeState::Settled),
        ] {
            for (customer, list) in lists.iter().enumerate() {
                let mut count = 0;
                let mut prev: Option<LabelId> = None;
                let mut cur = list.head;
                while let Some(c) = cur {
                    let node = &self.nodes[c.index()];
                    if node.state != expected || node.label.customer() != customer {
                        return Err(format!("{c} misplaced in {universe:?} list of {customer}"));
                    }
                    if node.prev != prev {
                        return Err(format!("{c} has a broken prev link"));
                    }
                    if let Some(p) = prev {
                        if self.label(p).reduced_cost() > node.label.reduced_cost() {
                            return Err(format!("{universe:?} list of {customer} is unsorted"));
                        }
                    }
                    count += 1;
                    if count > self.nodes.len() {
                        return Err(format!("{universe:?} list of {customer} is cyclic"));
                    }
                    prev = cur;
                    cur = node.next;
                }
                if prev != list.tail || count != list.len {
                    return Err(format!(
                        "{universe:?} list of {customer}: length {} but {count} linked",
                        list.len
                    ));
                }
            }
        }
        for (i, node) in self.nodes.iter().enumerate() {
            let id = LabelId::from_index(i);
            let mut steps = 0;
            let mut cur = node.parent;
            while let Some(p) = cur {
                steps += 1;
                if steps > self.nodes.len() {
                    return Err(format!("generation tree of {id} is cyclic"));
                }
                cur = self.parent(p);
            }
            let mut child = node.first_child;
            while let Some(c) = child {
                if self.parent(c) != Some(id) {
                    return Err(format!("{c} is linked under {id} but has another parent"));
                }
                if node.state == NodeState::Deleted && self.state(c) != NodeState::Deleted {
                    return Err(format!("{c} survived the deletion of {id}"));
                }
                child = self.nodes[c.index()].next_sibling;
            }
        }
        Ok(())
    }

    fn list_mut(&mut self, universe: Universe, customer: usize) -> &mut RankList {
        match universe {
            Universe::Active => &mut self.active[customer],
            Universe::Settled => &mut self.settled[customer],
        }
    }

    fn link_ranked(&mut self, universe: Universe, customer: usize, id: LabelId) {
        let rc = self.label(id).reduced_cost();
        let list = *self.list_mut(universe, customer);
        let mut before = list.head;
        while let Some(b) = before {
            if self.label(b).reduced_cost() >= rc {
                break;
            }
            before = self.nodes[b.index()].next;
        }
        let after = match before {
            Some(b) => self.nodes[b.index()].prev,
            None => list.tail,
        };
        self.nodes[id.index()].prev = after;
        self.nodes[id.index()].next = before;
        match after {
            Some(a) => self.nodes[a.index()].next = Some(id),
            None => self.list_mut(universe, customer).head = Some(id),
        }
        match before {
            Some(b) => self.nodes[b.index()].prev = Some(id),
            None => self.list_mut(universe, customer).tail = Some(id),
        }
        self.list_mut(universe, customer).len += 1;
    }

    fn unlink_ranked(&mut self, universe: Universe, customer: usize, id: LabelId) {
        let (prev, next) = {
            let node = &mut self.nodes[id.index()];
            (node.prev.take(), node.next.take())
        };
        match prev {
            Some(p) => self.nodes[p.index()].next = next,
            None => self.list_mut(universe, customer).head = next,
        }
        match next {
            Some(n) => self.nodes[n.index()].prev = prev,
            None => self.list_mut(universe, customer).tail = prev,
        }
        self.list_mut(universe, customer).len -= 1;
    }

    fn detach_from_parent(&mut self, id: LabelId) {
        let Some(parent) = self.nodes[id.index()].parent.take() else {
            return;
        };
        let (prev, next) = {
            let node = &mut self.nodes[id.index()];
            (node.prev_sibling.take(), node.next_sibling.take())
        };
        match prev {
            Some(p) => self.nodes[p.index()].next_sibling = next,
            None => self.nodes[parent.index()].first_child = next,
        }
        if let Some(n) = next {
            self.nodes[n.index()].prev_sibling = prev;
        }
    }
}

/// Iterator over a rank list.
#[derive(Debug, Clone)]
pub struct Ranked<'a> {
    pool: &'a LabelPool,
    next: Option<LabelId>,
}

impl Iterator for Ranked<'_> {
    type Item = LabelId;

    fn next(&mut self) -> Option<LabelId> {
        let cur = self.next?;
        self.next = self.pool.nodes[cur.index()].next;
        Some(cur)
    }
}

/// Iterator over the children of a node.
#[derive(Debug, Clone)]
pub struct Siblings<'a> {
    pool: &'a LabelPool,
    next: Option<LabelId>,
}

impl Iterator for Siblings<'_> {
    type Item = LabelId;

    fn next(&mut self) -> Option<LabelId> {
        let cur = self.next?;
        self.next = self.pool.nodes[cur.index()].next_sibling;
        Some(cur)
    }
}
