//! The character grid one effect run animates.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use glyphfall_core::{ColorMode, Coord, XtermCache};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use crate::character::{CharacterId, EffectCharacter};
use crate::error::{EngineError, EngineResult};

/// How input text is laid out into characters.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalConfig {
    /// Spaces substituted for each tab.
    pub tab_width: usize,
    /// Wrap lines longer than the viewport instead of clipping them.
    pub wrap_text: bool,
    /// Width and height of the drawable region. Without one the output area
    /// is exactly the input's bounding box.
    pub viewport: Option<(u16, u16)>,
    pub color_mode: ColorMode,
    /// Seed for [`Terminal::rng`]; entropy when unset.
    pub seed: Option<u64>,
    /// Xterm lookup table the terminal renders through. Clones share it.
    pub xterm_cache: XtermCache,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            wrap_text: false,
            viewport: None,
            color_mode: ColorMode::default(),
            seed: None,
            xterm_cache: XtermCache::new(),
        }
    }
}

/// Inclusive rectangle effects may place characters within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputArea {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl OutputArea {
    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    pub fn center(&self) -> Coord {
        Coord::new(
            self.left + (self.width() - 1) / 2,
            self.top + (self.height() - 1) / 2,
        )
    }

    pub fn contains(&self, coord: Coord) -> bool {
        (self.left..=self.right).contains(&coord.column) && (self.top..=self.bottom).contains(&coord.row)
    }
}

/// Orderings of character groups, each group drawn from one line of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    RowTopToBottom,
    RowBottomToTop,
    ColumnLeftToRight,
    ColumnRightToLeft,
    DiagonalTopLeftToBottomRight,
    DiagonalBottomRightToTopLeft,
    DiagonalBottomLeftToTopRight,
    DiagonalTopRightToBottomLeft,
    /// Concentric diamonds around the output-area center, innermost first.
    CenterToOutside,
    OutsideToCenter,
}

/// Flat orderings of every character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSort {
    TopToBottomLeftToRight,
    TopToBottomRightToLeft,
    BottomToTopLeftToRight,
    BottomToTopRightToLeft,
    /// Alternate between the first and last remaining character in reading
    /// order.
    OutsideRowToMiddle,
    MiddleRowToOutside,
    Random,
}

/// Owns every [`EffectCharacter`] of one run.
///
/// Characters are addressed by [`CharacterId`] and indexed by their input
/// coordinate, which is unique. Only characters marked active are ticked.
#[derive(Debug)]
pub struct Terminal {
    characters: Vec<EffectCharacter>,
    by_coord: HashMap<Coord, CharacterId>,
    active: BTreeSet<CharacterId>,
    output_area: OutputArea,
    color_mode: ColorMode,
    xterm_cache: XtermCache,
    rng: StdRng,
}

impl Terminal {
    /// Decompose `text` into one character per non-whitespace glyph.
    ///
    /// With a viewport the text block is centered inside it and anything
    /// that still falls outside is dropped.
    pub fn new(text: &str, config: &TerminalConfig) -> EngineResult<Self> {
        let tab = " ".repeat(config.tab_width);
        let mut lines: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.replace('\t', &tab).trim_end().chars().collect())
            .collect();
        if let (true, Some((width, _))) = (config.wrap_text, config.viewport) {
            let width = usize::from(width.max(1));
            lines = lines
                .into_iter()
                .flat_map(|line| {
                    if line.is_empty() {
                        vec![line]
                    } else {
                        line.chunks(width).map(<[char]>::to_vec).collect()
                    }
                })
                .collect();
        }

        let input_width = lines.iter().map(Vec::len).max().unwrap_or(0) as i32;
        let input_height = lines.len() as i32;
        let (column_offset, row_offset) = match config.viewport {
            Some((width, height)) => (
                ((i32::from(width) - input_width) / 2).max(0),
                ((i32::from(height) - input_height) / 2).max(0),
            ),
            None => (0, 0),
        };

        let mut glyphs = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            for (column, &symbol) in line.iter().enumerate() {
                if symbol.is_whitespace() {
                    continue;
                }
                let coord = Coord::new(column as i32 + column_offset, row as i32 + row_offset);
                glyphs.push((symbol, coord));
            }
        }
        if let Some((width, height)) = config.viewport {
            let before = glyphs.len();
            glyphs.retain(|(_, coord)| {
                coord.column < i32::from(width) && coord.row < i32::from(height)
            });
            if glyphs.len() < before {
                warn!(dropped = before - glyphs.len(), "input clipped to viewport");
            }
        }

        Self::from_characters(glyphs, config)
    }

    /// Build from explicit `(symbol, input coordinate)` pairs.
    pub fn from_characters(
        glyphs: impl IntoIterator<Item = (char, Coord)>,
        config: &TerminalConfig,
    ) -> EngineResult<Self> {
        let mut characters = Vec::new();
        let mut by_coord = HashMap::new();
        for (symbol, coord) in glyphs {
            let id = CharacterId(characters.len());
            if by_coord.insert(coord, id).is_some() {
                return Err(EngineError::DuplicateInputCoord { coord });
            }
            characters.push(EffectCharacter::new(id, symbol, coord));
        }

        let output_area = match config.viewport {
            Some((width, height)) => OutputArea {
                left: 0,
                top: 0,
                right: i32::from(width.max(1)) - 1,
                bottom: i32::from(height.max(1)) - 1,
            },
            None => OutputArea {
                left: 0,
                top: 0,
                right: characters.iter().map(|c| c.input_coord().column).max().unwrap_or(0).max(0),
                bottom: characters.iter().map(|c| c.input_coord().row).max().unwrap_or(0).max(0),
            },
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(characters = characters.len(), ?output_area, "terminal built");

        Ok(Self {
            characters,
            by_coord,
            active: BTreeSet::new(),
            output_area,
            color_mode: config.color_mode,
            xterm_cache: config.xterm_cache.clone(),
            rng,
        })
    }

    pub fn characters(&self) -> &[EffectCharacter] {
        &self.characters
    }

    pub fn characters_mut(&mut self) -> &mut [EffectCharacter] {
        &mut self.characters
    }

    pub fn character(&self, id: CharacterId) -> EngineResult<&EffectCharacter> {
        self.characters
            .get(id.0)
            .ok_or(EngineError::CharacterNotFound { id: id.0 })
    }

    pub fn character_mut(&mut self, id: CharacterId) -> EngineResult<&mut EffectCharacter> {
        self.characters
            .get_mut(id.0)
            .ok_or(EngineError::CharacterNotFound { id: id.0 })
    }

    /// The character whose home is `coord`.
    pub fn character_at(&self, coord: Coord) -> Option<&EffectCharacter> {
        self.by_coord.get(&coord).map(|id| &self.characters[id.0])
    }

    pub fn output_area(&self) -> OutputArea {
        self.output_area
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn xterm_cache(&self) -> &XtermCache {
        &self.xterm_cache
    }

    /// The run's random source, for effect jitter.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Character ids split into groups along `grouping`, each group in
    /// reading order.
    pub fn characters_grouped(&self, grouping: Grouping) -> Vec<Vec<CharacterId>> {
        let center = self.output_area.center();
        let key = |coord: Coord| match grouping {
            Grouping::RowTopToBottom | Grouping::RowBottomToTop => coord.row,
            Grouping::ColumnLeftToRight | Grouping::ColumnRightToLeft => coord.column,
            Grouping::DiagonalTopLeftToBottomRight | Grouping::DiagonalBottomRightToTopLeft => {
                coord.column + coord.row
            }
            Grouping::DiagonalBottomLeftToTopRight | Grouping::DiagonalTopRightToBottomLeft => {
                coord.column - coord.row
            }
            Grouping::CenterToOutside | Grouping::OutsideToCenter => {
                (coord.column - center.column).abs() + (coord.row - center.row).abs()
            }
        };

        let mut groups: BTreeMap<i32, Vec<CharacterId>> = BTreeMap::new();
        for character in &self.characters {
            groups
                .entry(key(character.input_coord()))
                .or_default()
                .push(character.id());
        }
        let mut groups: Vec<Vec<CharacterId>> = groups.into_values().collect();
        for group in &mut groups {
            group.sort_by_key(|id| reading_order(self.characters[id.0].input_coord()));
        }
        if matches!(
            grouping,
            Grouping::RowBottomToTop
                | Grouping::ColumnRightToLeft
                | Grouping::DiagonalBottomRightToTopLeft
                | Grouping::DiagonalTopRightToBottomLeft
                | Grouping::OutsideToCenter
        ) {
            groups.reverse();
        }
        groups
    }

    /// Every character id in the order given by `sort`.
    pub fn characters_sorted(&mut self, sort: CharacterSort) -> Vec<CharacterId> {
        let mut ids: Vec<CharacterId> = self.characters.iter().map(EffectCharacter::id).collect();
        let coord_of = |id: &CharacterId| self.characters[id.0].input_coord();
        match sort {
            CharacterSort::TopToBottomLeftToRight
            | CharacterSort::OutsideRowToMiddle
            | CharacterSort::MiddleRowToOutside => {
                ids.sort_by_key(|id| reading_order(coord_of(id)));
            }
            CharacterSort::TopToBottomRightToLeft => {
                ids.sort_by_key(|id| {
                    let coord = coord_of(id);
                    (coord.row, -coord.column)
                });
            }
            CharacterSort::BottomToTopLeftToRight => {
                ids.sort_by_key(|id| {
                    let coord = coord_of(id);
                    (-coord.row, coord.column)
                });
            }
            CharacterSort::BottomToTopRightToLeft => {
                ids.sort_by_key(|id| {
                    let coord = coord_of(id);
                    (-coord.row, -coord.column)
                });
            }
            CharacterSort::Random => ids.shuffle(&mut self.rng),
        }

        match sort {
            CharacterSort::OutsideRowToMiddle => alternate_ends(ids),
            CharacterSort::MiddleRowToOutside => {
                let mut ids = alternate_ends(ids);
                ids.reverse();
                ids
            }
            _ => ids,
        }
    }

    /// A random cell inside the output area, or one cell beyond a random edge
    /// of it when `outside` is set.
    pub fn random_coord(&mut self, outside: bool) -> Coord {
        let area = self.output_area;
        let column = self.rng.gen_range(area.left..=area.right);
        let row = self.rng.gen_range(area.top..=area.bottom);
        if !outside {
            return Coord::new(column, row);
        }
        match self.rng.gen_range(0..4) {
            0 => Coord::new(column, area.top - 1),
            1 => Coord::new(column, area.bottom + 1),
            2 => Coord::new(area.left - 1, row),
            _ => Coord::new(area.right + 1, row),
        }
    }

    pub fn set_visibility(&mut self, id: CharacterId, visible: bool) -> EngineResult<()> {
        self.character_mut(id)?.set_visible(visible);
        Ok(())
    }

    /// Include a character in subsequent ticks until it goes quiescent.
    pub fn activate_character(&mut self, id: CharacterId) -> EngineResult<()> {
        self.character(id)?;
        self.active.insert(id);
        Ok(())
    }

    /// Ids of the characters ticked on the next frame.
    pub fn active_characters(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.active.iter().copied()
    }

    /// Advance every active character by one tick, then drop the ones that
    /// have nothing left to do.
    pub fn tick(&mut self) -> EngineResult<()> {
        for id in &self.active {
            self.characters[id.0].tick()?;
        }
        let characters = &self.characters;
        let before = self.active.len();
        self.active.retain(|id| characters[id.0].is_active());
        if self.active.len() < before {
            trace!(
                retired = before - self.active.len(),
                remaining = self.active.len(),
                "characters went idle"
            );
        }
        Ok(())
    }

    /// Whether no character is active.
    pub fn is_complete(&self) -> bool {
        self.active.is_empty()
    }
}

fn reading_order(coord: Coord) -> (i32, i32) {
    (coord.row, coord.column)
}

fn alternate_ends(ids: Vec<CharacterId>) -> Vec<CharacterId> {
    let mut remaining = VecDeque::from(ids);
    let mut ordered = Vec::with_capacity(remaining.len());
    while let Some(id) = remaining.pop_front() {
        ordered.push(id);
        if let Some(id) = remaining.pop_back() {
            ordered.push(id);
        }
    }
    ordered
}
