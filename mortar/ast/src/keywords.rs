//! The reserved words of the supported resource scripts.
//!
//! Keyword ids are attached to nodes so translators can dispatch on integers
//! instead of strings. The compiler passes themselves never look at them.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Id of `on`, `true` and `yes`
pub const ID_ON: u32 = 1;
/// Id of `off`, `false` and `no`
pub const ID_OFF: u32 = 2;
/// The id of the first [`Keyword`]
pub const FIRST_KEYWORD_ID: u32 = 3;

const BUILTINS: [(&str, u32); 6] = [
    ("on", ID_ON),
    ("true", ID_ON),
    ("yes", ID_ON),
    ("off", ID_OFF),
    ("false", ID_OFF),
    ("no", ID_OFF),
];

macro_rules! keywords {
    ($($variant:ident => [$($word:literal),+],)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant),*
        }

        impl Keyword {
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant),*];

            /// The spellings of this keyword. Some keywords have british and american variants.
            pub fn words(self) -> &'static [&'static str] {
                match self {
                    $(Keyword::$variant => &[$($word),+]),*
                }
            }
        }
    };
}

impl Keyword {
    pub fn id(self) -> u32 {
        self as u32 + FIRST_KEYWORD_ID
    }

    pub fn from_id(id: u32) -> Option<Keyword> {
        let index = id.checked_sub(FIRST_KEYWORD_ID)?;
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }
}

keywords! {
    Material => ["material"],
    VertexProgram => ["vertex_program"],
    GeometryProgram => ["geometry_program"],
    FragmentProgram => ["fragment_program"],
    Technique => ["technique"],
    Pass => ["pass"],
    TextureUnit => ["texture_unit"],
    VertexProgramRef => ["vertex_program_ref"],
    GeometryProgramRef => ["geometry_program_ref"],
    FragmentProgramRef => ["fragment_program_ref"],
    ShadowCasterVertexProgramRef => ["shadow_caster_vertex_program_ref"],
    ShadowReceiverVertexProgramRef => ["shadow_receiver_vertex_program_ref"],
    ShadowReceiverFragmentProgramRef => ["shadow_receiver_fragment_program_ref"],
    LodValues => ["lod_values"],
    LodStrategy => ["lod_strategy"],
    LodDistances => ["lod_distances"],
    ReceiveShadows => ["receive_shadows"],
    TransparencyCastsShadows => ["transparency_casts_shadows"],
    SetTextureAlias => ["set_texture_alias"],
    Source => ["source"],
    Syntax => ["syntax"],
    DefaultParams => ["default_params"],
    ParamIndexed => ["param_indexed"],
    ParamNamed => ["param_named"],
    ParamIndexedAuto => ["param_indexed_auto"],
    ParamNamedAuto => ["param_named_auto"],
    Scheme => ["scheme"],
    LodIndex => ["lod_index"],
    ShadowCasterMaterial => ["shadow_caster_material"],
    ShadowReceiverMaterial => ["shadow_receiver_material"],
    GpuVendorRule => ["gpu_vendor_rule"],
    GpuDeviceRule => ["gpu_device_rule"],
    Include => ["include"],
    Exclude => ["exclude"],
    Ambient => ["ambient"],
    Diffuse => ["diffuse"],
    Specular => ["specular"],
    Emissive => ["emissive"],
    VertexColour => ["vertexcolour"],
    SceneBlend => ["scene_blend"],
    ColourBlend => ["colour_blend"],
    One => ["one"],
    Zero => ["zero"],
    DestColour => ["dest_colour"],
    SrcColour => ["src_colour"],
    OneMinusSrcColour => ["one_minus_src_colour"],
    OneMinusDestColour => ["one_minus_dest_colour"],
    DestAlpha => ["dest_alpha"],
    SrcAlpha => ["src_alpha"],
    OneMinusDestAlpha => ["one_minus_dest_alpha"],
    OneMinusSrcAlpha => ["one_minus_src_alpha"],
    SeparateSceneBlend => ["separate_scene_blend"],
    SceneBlendOp => ["scene_blend_op"],
    ReverseSubtract => ["reverse_subtract"],
    Min => ["min"],
    Max => ["max"],
    SeparateSceneBlendOp => ["separate_scene_blend_op"],
    DepthCheck => ["depth_check"],
    DepthWrite => ["depth_write"],
    DepthFunc => ["depth_func"],
    DepthBias => ["depth_bias"],
    IterationDepthBias => ["iteration_depth_bias"],
    AlwaysFail => ["always_fail"],
    AlwaysPass => ["always_pass"],
    LessEqual => ["less_equal"],
    Less => ["less"],
    Equal => ["equal"],
    NotEqual => ["not_equal"],
    GreaterEqual => ["greater_equal"],
    Greater => ["greater"],
    AlphaRejection => ["alpha_rejection"],
    AlphaToCoverage => ["alpha_to_coverage"],
    LightScissor => ["light_scissor"],
    LightClipPlanes => ["light_clip_planes"],
    TransparentSorting => ["transparent_sorting"],
    IlluminationStage => ["illumination_stage"],
    Decal => ["decal"],
    CullHardware => ["cull_hardware"],
    Clockwise => ["clockwise"],
    Anticlockwise => ["anticlockwise"],
    CullSoftware => ["cull_software"],
    Back => ["back"],
    Front => ["front"],
    NormaliseNormals => ["normalise_normals"],
    Lighting => ["lighting"],
    Shading => ["shading"],
    Flat => ["flat"],
    Gouraud => ["gouraud"],
    Phong => ["phong"],
    PolygonMode => ["polygon_mode"],
    Solid => ["solid"],
    Wireframe => ["wireframe"],
    Points => ["points"],
    PolygonModeOverrideable => ["polygon_mode_overrideable"],
    FogOverride => ["fog_override"],
    None => ["none"],
    Linear => ["linear"],
    Exp => ["exp"],
    Exp2 => ["exp2"],
    ColourWrite => ["colour_write"],
    MaxLights => ["max_lights"],
    StartLight => ["start_light"],
    Iteration => ["iteration"],
    Once => ["once"],
    OncePerLight => ["once_per_light"],
    PerNLights => ["per_n_lights"],
    PerLight => ["per_light"],
    Point => ["point"],
    Spot => ["spot"],
    Directional => ["directional"],
    PointSize => ["point_size"],
    PointSprites => ["point_sprites"],
    PointSizeMin => ["point_size_min"],
    PointSizeMax => ["point_size_max"],
    PointSizeAttenuation => ["point_size_attenuation"],
    TextureAlias => ["texture_alias"],
    Texture => ["texture"],
    Tex1d => ["1d"],
    Tex2d => ["2d"],
    Tex3d => ["3d"],
    Cubic => ["cubic"],
    Unlimited => ["unlimited"],
    Alpha => ["alpha"],
    Gamma => ["gamma"],
    AnimTexture => ["anim_texture"],
    CubicTexture => ["cubic_texture"],
    SeparateUv => ["separateUV"],
    CombinedUvw => ["combinedUVW"],
    TexCoordSet => ["tex_coord_set"],
    TexAddressMode => ["tex_address_mode"],
    Wrap => ["wrap"],
    Clamp => ["clamp"],
    Mirror => ["mirror"],
    Border => ["border"],
    TexBorderColour => ["tex_border_colour"],
    Filtering => ["filtering"],
    Bilinear => ["bilinear"],
    Trilinear => ["trilinear"],
    Anisotropic => ["anisotropic"],
    MaxAnisotropy => ["max_anisotropy"],
    MipmapBias => ["mipmap_bias"],
    ColorOp => ["color_op", "colour_op"],
    Replace => ["replace"],
    Add => ["add"],
    Modulate => ["modulate"],
    AlphaBlend => ["alpha_blend"],
    ColorOpEx => ["color_op_ex", "colour_op_ex"],
    Source1 => ["source1"],
    Source2 => ["source2"],
    ModulateX2 => ["modulate_x2"],
    ModulateX4 => ["modulate_x4"],
    AddSigned => ["add_signed"],
    AddSmooth => ["add_smooth"],
    Subtract => ["subtract"],
    BlendDiffuseAlpha => ["blend_diffuse_alpha"],
    BlendTextureAlpha => ["blend_texture_alpha"],
    BlendCurrentAlpha => ["blend_current_alpha"],
    BlendManual => ["blend_manual"],
    DotProduct => ["dotproduct"],
    BlendDiffuseColour => ["blend_diffuse_colour"],
    SrcCurrent => ["src_current"],
    SrcTexture => ["src_texture"],
    SrcDiffuse => ["src_diffuse"],
    SrcSpecular => ["src_specular"],
    SrcManual => ["src_manual"],
    ColorOpMultipassFallback => ["color_op_multipass_fallback", "colour_op_multipass_fallback"],
    AlphaOpEx => ["alpha_op_ex"],
    EnvMap => ["env_map"],
    Spherical => ["spherical"],
    Planar => ["planar"],
    CubicReflection => ["cubic_reflection"],
    CubicNormal => ["cubic_normal"],
    Scroll => ["scroll"],
    ScrollAnim => ["scroll_anim"],
    Rotate => ["rotate"],
    RotateAnim => ["rotate_anim"],
    Scale => ["scale"],
    WaveXform => ["wave_xform"],
    ScrollX => ["scroll_x"],
    ScrollY => ["scroll_y"],
    ScaleX => ["scale_x"],
    ScaleY => ["scale_y"],
    Sine => ["sine"],
    Triangle => ["triangle"],
    Sawtooth => ["sawtooth"],
    Square => ["square"],
    InverseSawtooth => ["inverse_sawtooth"],
    PulseWidthModulation => ["pulse_width_modulation"],
    Transform => ["transform"],
    BindingType => ["binding_type"],
    Vertex => ["vertex"],
    Fragment => ["fragment"],
    ContentType => ["content_type"],
    Named => ["named"],
    Shadow => ["shadow"],
    TextureSource => ["texture_source"],
    SharedParams => ["shared_params"],
    SharedParamNamed => ["shared_param_named"],
    SharedParamsRef => ["shared_params_ref"],
    ParticleSystem => ["particle_system"],
    Emitter => ["emitter"],
    Affector => ["affector"],
    Compositor => ["compositor"],
    Target => ["target"],
    TargetOutput => ["target_output"],
    Input => ["input"],
    Previous => ["previous"],
    TargetWidth => ["target_width"],
    TargetHeight => ["target_height"],
    TargetWidthScaled => ["target_width_scaled"],
    TargetHeightScaled => ["target_height_scaled"],
    Pooled => ["pooled"],
    NoFsaa => ["no_fsaa"],
    TextureRef => ["texture_ref"],
    ScopeLocal => ["local_scope"],
    ScopeChain => ["chain_scope"],
    ScopeGlobal => ["global_scope"],
    CompositorLogic => ["compositor_logic"],
    OnlyInitial => ["only_initial"],
    VisibilityMask => ["visibility_mask"],
    LodBias => ["lod_bias"],
    MaterialScheme => ["material_scheme"],
    ShadowsEnabled => ["shadows"],
    Clear => ["clear"],
    Stencil => ["stencil"],
    RenderScene => ["render_scene"],
    RenderQuad => ["render_quad"],
    Identifier => ["identifier"],
    FirstRenderQueue => ["first_render_queue"],
    LastRenderQueue => ["last_render_queue"],
    QuadNormals => ["quad_normals"],
    CameraFarCornersViewSpace => ["camera_far_corners_view_space"],
    CameraFarCornersWorldSpace => ["camera_far_corners_world_space"],
    Buffers => ["buffers"],
    Colour => ["colour"],
    Depth => ["depth"],
    ColourValue => ["colour_value"],
    DepthValue => ["depth_value"],
    StencilValue => ["stencil_value"],
    Check => ["check"],
    CompFunc => ["comp_func"],
    RefValue => ["ref_value"],
    Mask => ["mask"],
    FailOp => ["fail_op"],
    Keep => ["keep"],
}

/// Maps words to keyword ids
#[derive(Debug, Clone)]
pub struct KeywordTable {
    words: FxHashMap<SmolStr, u32>,
}

impl KeywordTable {
    /// A table without any keyword, not even the builtin boolean words
    pub fn empty() -> Self {
        KeywordTable {
            words: FxHashMap::default(),
        }
    }

    pub fn lookup(&self, word: &str) -> Option<u32> {
        self.words.get(word).copied()
    }

    pub fn keyword(&self, word: &str) -> Option<Keyword> {
        self.lookup(word).and_then(Keyword::from_id)
    }

    /// Registers a custom word. Returns the id that was previously registered for `word`.
    pub fn register(&mut self, word: impl Into<SmolStr>, id: u32) -> Option<u32> {
        self.words.insert(word.into(), id)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        let mut table = KeywordTable::empty();
        for (word, id) in BUILTINS {
            table.register(word, id);
        }
        for keyword in Keyword::ALL {
            for word in keyword.words() {
                table.register(*word, keyword.id());
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::{Keyword, KeywordTable, FIRST_KEYWORD_ID, ID_OFF, ID_ON};

    #[test]
    fn builtins() {
        let table = KeywordTable::default();
        for word in ["on", "true", "yes"] {
            assert_eq!(table.lookup(word), Some(ID_ON));
        }
        for word in ["off", "false", "no"] {
            assert_eq!(table.lookup(word), Some(ID_OFF));
        }
    }

    #[test]
    fn ids_follow_declaration_order() {
        assert_eq!(Keyword::Material.id(), FIRST_KEYWORD_ID);
        assert_eq!(Keyword::from_id(FIRST_KEYWORD_ID), Some(Keyword::Material));
        assert_eq!(Keyword::from_id(ID_OFF), None);
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::from_id(keyword.id()), Some(*keyword));
        }
    }

    #[test]
    fn aliases_share_an_id() {
        let table = KeywordTable::default();
        assert_eq!(table.lookup("colour_op"), table.lookup("color_op"));
        assert_eq!(table.keyword("colour_op_ex"), Some(Keyword::ColorOpEx));
        assert_eq!(table.keyword("particle_system"), Some(Keyword::ParticleSystem));
        assert_eq!(table.lookup("definitely_not_a_keyword"), None);
    }

    #[test]
    fn texture_types_start_with_a_digit() {
        let table = KeywordTable::default();
        assert_eq!(table.keyword("1d"), Some(Keyword::Tex1d));
        assert_eq!(table.keyword("2d"), Some(Keyword::Tex2d));
        assert_eq!(table.keyword("3d"), Some(Keyword::Tex3d));
        assert_eq!(Keyword::Tex2d.words(), ["2d"]);
    }

    #[test]
    fn custom_words() {
        let mut table = KeywordTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.register("glow", 1000), None);
        assert_eq!(table.lookup("glow"), Some(1000));
        assert_eq!(table.keyword("glow"), None);
    }
}
