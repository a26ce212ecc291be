use crate::pipeline::ColorSample;

const ROLE_NAMES: [&str; Role::COUNT] = [
    "color0",
    "color1",
    "color2",
    "color3",
    "color4",
    "color5",
    "color6",
    "color7",
    "color8",
    "color9",
    "color10",
    "color11",
    "color12",
    "color13",
    "color14",
    "color15",
    "background",
    "foreground",
];

/// One of the 18 slots of a terminal color scheme: numbered colors 0-15 plus the
/// background and foreground sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Role(u8);

impl Role {
    pub const COUNT: usize = 18;
    pub const BACKGROUND: Role = Role(16);
    pub const FOREGROUND: Role = Role(17);

    /// Numbered role `colorN`, if `n` is in 0..=15.
    pub const fn color(n: u8) -> Option<Role> {
        if n < 16 {
            Some(Role(n))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Role> {
        (0..Self::COUNT as u8).map(Role)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The slot number for `colorN` roles, `None` for the sentinels.
    pub const fn number(self) -> Option<u8> {
        if self.0 < 16 {
            Some(self.0)
        } else {
            None
        }
    }

    pub const fn name(self) -> &'static str {
        ROLE_NAMES[self.0 as usize]
    }

    pub fn from_name(name: &str) -> Option<Role> {
        ROLE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Role(i as u8))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Role assignments produced by the delegator. Each role holds at most one sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    entries: [Option<ColorSample>; Role::COUNT],
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: Role) -> Option<&ColorSample> {
        self.entries[role.index()].as_ref()
    }

    /// Place `sample` in `role`, returning whatever it displaced.
    pub fn insert(&mut self, role: Role, sample: ColorSample) -> Option<ColorSample> {
        self.entries[role.index()].replace(sample)
    }

    pub fn remove(&mut self, role: Role) -> Option<ColorSample> {
        self.entries[role.index()].take()
    }

    pub fn background(&self) -> Option<&ColorSample> {
        self.get(Role::BACKGROUND)
    }

    pub fn foreground(&self) -> Option<&ColorSample> {
        self.get(Role::FOREGROUND)
    }

    /// Filled roles in role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &ColorSample)> {
        Role::all().filter_map(|role| self.get(role).map(|s| (role, s)))
    }

    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether all 16 numbered roles and both sentinels are filled.
    pub fn is_complete(&self) -> bool {
        self.len() == Role::COUNT
    }
}
