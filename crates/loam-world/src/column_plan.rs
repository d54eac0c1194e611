use crate::{CHUNK_SIZE_X, CHUNK_SIZE_Z, ChunkCoord, World, WorldGenError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnInfo {
    pub lx: usize,
    pub lz: usize,
    /// Cells `[0, height)` are filled, everything above is air.
    pub height: i32,
    pub rock_override: bool,
}

/// Material class of one cell in a planned column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnLayer {
    Air,
    Cover,
    Soil,
    Rock,
}

impl ColumnInfo {
    #[inline]
    pub fn layer_at(&self, y: i32, soil_depth: u32) -> ColumnLayer {
        if y < 0 || y >= self.height {
            return ColumnLayer::Air;
        }
        if self.rock_override {
            return ColumnLayer::Rock;
        }
        let cover_y = self.height - 1;
        if y == cover_y {
            ColumnLayer::Cover
        } else if y >= cover_y - soil_depth as i32 {
            ColumnLayer::Soil
        } else {
            ColumnLayer::Rock
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChunkColumnPlan {
    pub coord: ChunkCoord,
    pub columns: Vec<ColumnInfo>,
    pub soil_depth: u32,
    pub width: usize,
    pub depth: usize,
}

impl ChunkColumnPlan {
    #[inline]
    pub fn index(&self, lx: usize, lz: usize) -> usize {
        lz * self.width + lx
    }

    #[inline]
    pub fn column(&self, lx: usize, lz: usize) -> &ColumnInfo {
        &self.columns[self.index(lx, lz)]
    }

    #[inline]
    pub fn layer_at(&self, lx: usize, y: i32, lz: usize) -> ColumnLayer {
        self.column(lx, lz).layer_at(y, self.soil_depth)
    }

    pub fn max_height(&self) -> i32 {
        self.columns.iter().map(|c| c.height).max().unwrap_or(0)
    }
}

/// Plans every column of `coord` under the world's active biome.
pub fn build_chunk_column_plan(
    world: &World,
    coord: ChunkCoord,
) -> Result<ChunkColumnPlan, WorldGenError> {
    let def = world.active_biome()?;
    let noise = world.noise();
    let secondary = def.blend.secondary_field(noise);

    let mut columns = Vec::with_capacity(CHUNK_SIZE_X * CHUNK_SIZE_Z);
    for lz in 0..CHUNK_SIZE_Z {
        for lx in 0..CHUNK_SIZE_X {
            let frac = def
                .blend
                .height_fraction(noise, secondary.as_ref(), coord, lx, lz);
            let height = def.target_y(frac);
            let rock_override = def.rock_line.is_some_and(|rl| {
                let r = noise.sample(coord, lx, lz, rl.scale, 1.0, 1.0);
                rl.is_rock(height, r)
            });
            columns.push(ColumnInfo {
                lx,
                lz,
                height,
                rock_override,
            });
        }
    }

    Ok(ChunkColumnPlan {
        coord,
        columns,
        soil_depth: def.soil_depth,
        width: CHUNK_SIZE_X,
        depth: CHUNK_SIZE_Z,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(height: i32, rock_override: bool) -> ColumnInfo {
        ColumnInfo {
            lx: 0,
            lz: 0,
            height,
            rock_override,
        }
    }

    #[test]
    fn layers_stack_cover_soil_rock() {
        let c = col(10, false);
        assert_eq!(c.layer_at(10, 3), ColumnLayer::Air);
        assert_eq!(c.layer_at(9, 3), ColumnLayer::Cover);
        for y in 6..9 {
            assert_eq!(c.layer_at(y, 3), ColumnLayer::Soil, "y={y}");
        }
        assert_eq!(c.layer_at(5, 3), ColumnLayer::Rock);
        assert_eq!(c.layer_at(0, 3), ColumnLayer::Rock);
        assert_eq!(c.layer_at(-1, 3), ColumnLayer::Air);
    }

    #[test]
    fn rock_override_only_changes_material() {
        let c = col(10, true);
        for y in 0..10 {
            assert_eq!(c.layer_at(y, 3), ColumnLayer::Rock);
        }
        assert_eq!(c.layer_at(10, 3), ColumnLayer::Air);
    }

    #[test]
    fn short_columns_keep_their_cover() {
        let c = col(2, false);
        assert_eq!(c.layer_at(1, 3), ColumnLayer::Cover);
        assert_eq!(c.layer_at(0, 3), ColumnLayer::Soil);
        assert_eq!(col(0, false).layer_at(0, 3), ColumnLayer::Air);
    }
}
