use std::collections::HashSet;

/// Byte placement of one uniform within its block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformSlot {
    pub offset: u32,
    pub size: u32,
}

/// One `var<uniform>` struct: its resource binding, total byte span, and
/// named members.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    pub group: u32,
    pub binding: u32,
    pub size: u32,
    members: Vec<(String, UniformSlot)>,
}

impl UniformBlock {
    pub fn members(&self) -> impl Iterator<Item = (&str, UniformSlot)> {
        self.members.iter().map(|(n, s)| (n.as_str(), *s))
    }
}

/// Name → slot mapping reflected from a validated module.
///
/// Resolved once per program build; must be re-resolved if the program is
/// ever recreated.
#[derive(Debug, Clone, Default)]
pub struct UniformTable {
    blocks: Vec<UniformBlock>,
}

impl UniformTable {
    /// Reflects every uniform-space struct global in declaration order.
    pub(crate) fn reflect(module: &naga::Module) -> Self {
        let mut blocks = Vec::new();

        for (_, var) in module.global_variables.iter() {
            if var.space != naga::AddressSpace::Uniform {
                continue;
            }
            let Some(res) = &var.binding else { continue };
            let naga::TypeInner::Struct { members, span } = &module.types[var.ty].inner else {
                continue;
            };

            let mut slots = Vec::with_capacity(members.len());
            for m in members {
                let Some(name) = &m.name else { continue };
                let size = module.types[m.ty].inner.size(module.to_ctx());
                slots.push((
                    name.clone(),
                    UniformSlot {
                        offset: m.offset,
                        size,
                    },
                ));
            }

            blocks.push(UniformBlock {
                group: res.group,
                binding: res.binding,
                size: *span,
                members: slots,
            });
        }

        Self { blocks }
    }

    #[inline]
    pub fn blocks(&self) -> &[UniformBlock] {
        &self.blocks
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Looks a member up by name across blocks, in declaration order.
    pub fn lookup(&self, name: &str) -> Option<(usize, UniformSlot)> {
        self.blocks.iter().enumerate().find_map(|(i, block)| {
            block
                .members
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, slot)| (i, *slot))
        })
    }
}

/// CPU staging copy of the uniform blocks, written by name and uploaded
/// wholesale once per render.
///
/// Unknown names are no-ops (logged once per name): simpler shader variants
/// may legitimately omit optional uniforms such as the detail-ramp budget.
pub struct UniformStaging {
    table: UniformTable,
    blocks: Vec<Vec<u8>>,
    unknown_warned: HashSet<String>,
}

impl UniformStaging {
    pub fn new(table: UniformTable) -> Self {
        let blocks = table
            .blocks()
            .iter()
            .map(|b| vec![0u8; b.size as usize])
            .collect();

        Self {
            table,
            blocks,
            unknown_warned: HashSet::new(),
        }
    }

    #[inline]
    pub fn table(&self) -> &UniformTable {
        &self.table
    }

    #[inline]
    pub fn block_bytes(&self, index: usize) -> &[u8] {
        &self.blocks[index]
    }

    pub fn set_f32(&mut self, name: &str, value: f32) {
        self.write(name, bytemuck::bytes_of(&value));
    }

    pub fn set_u32(&mut self, name: &str, value: u32) {
        self.write(name, bytemuck::bytes_of(&value));
    }

    pub fn set_vec2(&mut self, name: &str, value: [f32; 2]) {
        self.write(name, bytemuck::cast_slice(&value));
    }

    /// Writes a column-major 3×3 matrix with the 16-byte column stride the
    /// uniform address space requires.
    pub fn set_mat3(&mut self, name: &str, m: [f32; 9]) {
        let mut padded = [0.0f32; 12];
        for col in 0..3 {
            padded[col * 4..col * 4 + 3].copy_from_slice(&m[col * 3..col * 3 + 3]);
        }
        self.write(name, bytemuck::cast_slice(&padded));
    }

    fn write(&mut self, name: &str, bytes: &[u8]) {
        let Some((block, slot)) = self.table.lookup(name) else {
            if self.unknown_warned.insert(name.to_owned()) {
                log::debug!("uniform `{name}` not present in shader; ignoring");
            }
            return;
        };

        if bytes.len() != slot.size as usize {
            if self.unknown_warned.insert(name.to_owned()) {
                log::debug!(
                    "uniform `{name}` is {} bytes in the shader, write of {} ignored",
                    slot.size,
                    bytes.len()
                );
            }
            return;
        }

        let start = slot.offset as usize;
        self.blocks[block][start..start + bytes.len()].copy_from_slice(bytes);
    }
}
