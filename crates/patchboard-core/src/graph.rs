/// Named nodes of the process graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessNode {
    Supervising,
    Discovering,
    Fixing,
    Integration,
}

impl ProcessNode {
    pub const ALL: [ProcessNode; 4] = [
        ProcessNode::Supervising,
        ProcessNode::Discovering,
        ProcessNode::Fixing,
        ProcessNode::Integration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProcessNode::Supervising => "Supervisor",
            ProcessNode::Discovering => "Hacker",
            ProcessNode::Fixing => "Fixer",
            ProcessNode::Integration => "GitHub",
        }
    }

    fn index(self) -> usize {
        match self {
            ProcessNode::Supervising => 0,
            ProcessNode::Discovering => 1,
            ProcessNode::Fixing => 2,
            ProcessNode::Integration => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationClass {
    Hacking,
    Fixing,
    Merging,
}

impl AnimationClass {
    pub fn class_name(self) -> &'static str {
        match self {
            AnimationClass::Hacking => "anim-hacking",
            AnimationClass::Fixing => "anim-fixing",
            AnimationClass::Merging => "anim-merging",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphState {
    #[default]
    Idle,
    Hacking,
    Fixing,
    Merging,
    Creating,
}

// Checked in order; the first keyword found in the step label wins.
const STEP_KEYWORDS: [(&str, GraphState); 4] = [
    ("Hacking", GraphState::Hacking),
    ("Fixing", GraphState::Fixing),
    ("Merging", GraphState::Merging),
    ("Creating", GraphState::Creating),
];

impl GraphState {
    pub fn from_step(step: Option<&str>) -> Self {
        let Some(step) = step.filter(|step| !step.is_empty()) else {
            return GraphState::Idle;
        };
        STEP_KEYWORDS
            .iter()
            .find(|(keyword, _)| step.contains(keyword))
            .map(|(_, state)| *state)
            .unwrap_or(GraphState::Idle)
    }

    pub fn active_nodes(self) -> &'static [ProcessNode] {
        match self {
            GraphState::Idle => &[],
            GraphState::Hacking => &[ProcessNode::Supervising, ProcessNode::Discovering],
            GraphState::Fixing => &[ProcessNode::Supervising, ProcessNode::Fixing],
            GraphState::Merging => &[ProcessNode::Supervising, ProcessNode::Integration],
            GraphState::Creating => &[ProcessNode::Integration],
        }
    }

    pub fn animation(self) -> Option<AnimationClass> {
        match self {
            GraphState::Hacking => Some(AnimationClass::Hacking),
            GraphState::Fixing => Some(AnimationClass::Fixing),
            GraphState::Merging => Some(AnimationClass::Merging),
            GraphState::Idle | GraphState::Creating => None,
        }
    }
}

/// Node highlight marks and the container's animation class.
#[derive(Debug, Default)]
pub struct GraphAnimator {
    state: GraphState,
    active: [bool; 4],
    animation: Option<AnimationClass>,
}

impl GraphAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every mark, then applies the marks of the matched state.
    pub fn apply(&mut self, step: Option<&str>) -> GraphState {
        self.active = [false; 4];
        self.animation = None;

        let state = GraphState::from_step(step);
        for node in state.active_nodes() {
            self.active[node.index()] = true;
        }
        self.animation = state.animation();
        self.state = state;
        state
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub fn is_active(&self, node: ProcessNode) -> bool {
        self.active[node.index()]
    }

    pub fn animation(&self) -> Option<AnimationClass> {
        self.animation
    }

    pub fn active_nodes(&self) -> Vec<ProcessNode> {
        ProcessNode::ALL
            .into_iter()
            .filter(|node| self.is_active(*node))
            .collect()
    }
}
