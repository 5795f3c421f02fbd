use crate::{
    effect::field::RayInstance,
    host::{BlendMode, SpriteDraw, SpriteSurface, TextureHandle},
};

const RAY_LAYER: f32 = 1.0;

/// Switches the open batch to additive blending and switches it back to
/// whatever was open before when dropped, early returns included.
pub struct AdditiveScope<'s, S: SpriteSurface + ?Sized> {
    surface: &'s mut S,
    previous: BlendMode,
}

impl<'s, S: SpriteSurface + ?Sized> AdditiveScope<'s, S> {
    pub fn enter(surface: &'s mut S) -> Self {
        let previous = surface.blend_mode();
        surface.end();
        surface.begin(BlendMode::Additive);
        Self { surface, previous }
    }

    pub fn draw(&mut self, texture: TextureHandle, sprite: &SpriteDraw) {
        self.surface.draw(texture, sprite);
    }
}

impl<S: SpriteSurface + ?Sized> Drop for AdditiveScope<'_, S> {
    fn drop(&mut self) {
        self.surface.end();
        self.surface.begin(self.previous);
    }
}

impl RayInstance {
    #[must_use]
    pub fn sprite(&self, rotation: f32) -> SpriteDraw {
        SpriteDraw {
            position: self.position,
            source: self.source,
            color: self.color,
            rotation,
            origin: self.origin,
            scale: self.scale,
            layer_depth: RAY_LAYER,
        }
    }
}

/// Draws every ray under one additive scope. The scope is only opened once
/// there is something to draw. Returns the number of rays drawn.
pub fn draw_field<S, I>(
    surface: &mut S,
    texture: TextureHandle,
    rotation: f32,
    rays: I,
) -> usize
where
    S: SpriteSurface + ?Sized,
    I: IntoIterator<Item = RayInstance>,
{
    let mut rays = rays.into_iter().peekable();
    if rays.peek().is_none() {
        return 0;
    }
    let mut scope = AdditiveScope::enter(surface);
    let mut drawn = 0;
    for ray in rays {
        scope.draw(texture, &ray.sprite(rotation));
        drawn += 1;
    }
    drawn
}
